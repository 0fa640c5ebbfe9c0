//! Organisation group results

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grouping::{
    GroupingReason, OrganisationGroupTypeClassification, OrganisationGroupTypeCode,
    OrganisationGroupTypeIdentifier, OrganisationGroupingConfiguration,
};
use super::organisation::{OrganisationIdentifier, TargetOrganisationGroup};
use super::provider::Provider;

/// One generated organisation group and the providers that belong to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationGroupResult {
    pub group_type_classification: OrganisationGroupTypeClassification,
    pub group_type_code: OrganisationGroupTypeCode,
    pub group_type_identifier: OrganisationGroupTypeIdentifier,
    pub grouping_reason: GroupingReason,
    pub identifier_value: String,
    pub name: String,
    /// `name` normalised for use as a search index key
    pub searchable_name: String,
    pub identifiers: Option<Vec<OrganisationIdentifier>>,
    pub providers: Vec<Provider>,
}

impl OrganisationGroupResult {
    /// Combine a rule's static fields with a resolved identity and its members
    #[must_use]
    pub fn new(
        rule: &OrganisationGroupingConfiguration,
        target: TargetOrganisationGroup,
        providers: Vec<Provider>,
    ) -> Self {
        let searchable_name = searchable_name(&target.name);
        Self {
            group_type_classification: rule.group_type_classification,
            group_type_code: rule.organisation_group_type_code,
            group_type_identifier: rule.group_type_identifier,
            grouping_reason: rule.grouping_reason,
            identifier_value: target.identifier,
            name: target.name,
            searchable_name,
            identifiers: target.identifiers,
            providers,
        }
    }
}

/// Replace every run of non-alphanumeric characters with a single underscore
///
/// Leading and trailing separators are dropped, so `" St. Mary's "` becomes
/// `"St_Mary_s"`.
#[must_use]
pub fn searchable_name(name: &str) -> String {
    let mut searchable = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !searchable.is_empty() {
                searchable.push('_');
            }
            pending_separator = false;
            searchable.push(c);
        } else {
            pending_separator = true;
        }
    }

    searchable
}

/// Count results per group type code and grouping reason
#[must_use]
pub fn summarise(
    results: &[OrganisationGroupResult],
) -> BTreeMap<(String, String), usize> {
    let mut counts = BTreeMap::new();
    for result in results {
        *counts
            .entry((
                result.group_type_code.to_string(),
                result.grouping_reason.to_string(),
            ))
            .or_insert(0) += 1;
    }
    counts
}
