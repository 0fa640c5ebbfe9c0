//! Resolved organisation identities and payment organisation registry records

use serde::{Deserialize, Serialize};

use super::grouping::OrganisationGroupTypeIdentifier;
use super::provider::non_blank;

/// An alternate identifier of an organisation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationIdentifier {
    #[serde(rename = "type")]
    pub identifier_type: OrganisationGroupTypeIdentifier,
    pub value: String,
}

impl OrganisationIdentifier {
    pub fn new(identifier_type: OrganisationGroupTypeIdentifier, value: impl Into<String>) -> Self {
        Self {
            identifier_type,
            value: value.into(),
        }
    }
}

/// Collects alternate identifiers, skipping blank values
#[derive(Debug, Default)]
pub(crate) struct IdentifierListBuilder {
    identifiers: Vec<OrganisationIdentifier>,
}

impl IdentifierListBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(
        &mut self,
        identifier_type: OrganisationGroupTypeIdentifier,
        value: Option<&str>,
    ) -> &mut Self {
        if let Some(value) = non_blank(value) {
            self.identifiers
                .push(OrganisationIdentifier::new(identifier_type, value));
        }
        self
    }

    pub(crate) fn build(&mut self) -> Vec<OrganisationIdentifier> {
        std::mem::take(&mut self.identifiers)
    }
}

/// The canonical identity of one organisation group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOrganisationGroup {
    /// Primary identifier of the group
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Alternate identifiers.
    ///
    /// `None` means the lookup path has no alternate identifiers for this kind
    /// of group; `Some(vec![])` means it looked and found none.
    pub identifiers: Option<Vec<OrganisationIdentifier>>,
}

/// A payment organisation record from the external registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentOrganisation {
    pub provider_snapshot_id: i32,
    pub name: String,
    pub ukprn: Option<String>,
    pub trust_code: Option<String>,
    pub urn: Option<String>,
    pub la_code: Option<String>,
    pub companies_house_number: Option<String>,
    pub organisation_type: String,
}

impl PaymentOrganisation {
    /// Identifiers carried by the record, in registry field order
    #[must_use]
    pub fn identifiers(&self) -> Vec<OrganisationIdentifier> {
        IdentifierListBuilder::new()
            .push(OrganisationGroupTypeIdentifier::Ukprn, self.ukprn.as_deref())
            .push(
                OrganisationGroupTypeIdentifier::AcademyTrustCode,
                self.trust_code.as_deref(),
            )
            .push(OrganisationGroupTypeIdentifier::Urn, self.urn.as_deref())
            .push(OrganisationGroupTypeIdentifier::LaCode, self.la_code.as_deref())
            .push(
                OrganisationGroupTypeIdentifier::CompaniesHouseNumber,
                self.companies_house_number.as_deref(),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_identifiers_skip_blank_fields() {
        let organisation = PaymentOrganisation {
            provider_snapshot_id: 12345,
            name: "Oak Trust".to_string(),
            ukprn: Some("9001".to_string()),
            trust_code: Some("  ".to_string()),
            companies_house_number: Some("08123456".to_string()),
            organisation_type: "AcademyTrust".to_string(),
            ..PaymentOrganisation::default()
        };

        assert_eq!(
            organisation.identifiers(),
            vec![
                OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::Ukprn, "9001"),
                OrganisationIdentifier::new(
                    OrganisationGroupTypeIdentifier::CompaniesHouseNumber,
                    "08123456"
                ),
            ]
        );
    }
}
