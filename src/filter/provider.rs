//! Provider filtering criteria
//!
//! Grouping rules may restrict the providers they group by provider
//! type/subtype and by status. Both lists are optional and independent; a
//! provider must pass every list the rule declares.

use crate::models::{OrganisationGroupingConfiguration, Provider, ProviderTypeMatch};

/// Defines a criterion for filtering entities
pub trait FilterCriteria<T> {
    /// Determine if an entity meets the filter criteria
    fn meets_criteria(&self, entity: &T) -> bool;
}

/// True if the provider's type and subtype equal any pair, ignoring case
#[must_use]
pub fn matches_type_subtype(provider: &Provider, matches: &[ProviderTypeMatch]) -> bool {
    matches.iter().any(|m| {
        m.provider_type.eq_ignore_ascii_case(&provider.provider_type)
            && m.provider_subtype.eq_ignore_ascii_case(&provider.provider_sub_type)
    })
}

/// True if the provider's status equals any of the statuses, ignoring case
#[must_use]
pub fn matches_status(provider: &Provider, statuses: &[String]) -> bool {
    let Some(status) = provider.status.as_deref() else {
        return false;
    };

    statuses.iter().any(|s| s.eq_ignore_ascii_case(status))
}

/// A filter that can be applied to a provider
#[derive(Debug, Clone)]
pub enum ProviderFilter<'a> {
    /// Provider type/subtype allow-list
    TypeSubtype(&'a [ProviderTypeMatch]),
    /// Provider status allow-list
    Status(&'a [String]),
    /// Combined filter that requires all criteria to be met
    All(Vec<ProviderFilter<'a>>),
}

impl<'a> ProviderFilter<'a> {
    /// Build the filter a grouping rule declares
    ///
    /// A rule without allow-lists yields an empty `All`, which accepts every
    /// provider. An allow-list that is present but empty is treated the same
    /// way as an absent one.
    #[must_use]
    pub fn for_rule(rule: &'a OrganisationGroupingConfiguration) -> Self {
        let mut filters = Vec::with_capacity(2);

        if let Some(matches) = rule.provider_type_match.as_deref() {
            if !matches.is_empty() {
                filters.push(Self::TypeSubtype(matches));
            }
        }

        if let Some(statuses) = rule.provider_status.as_deref() {
            if !statuses.is_empty() {
                filters.push(Self::Status(statuses));
            }
        }

        Self::All(filters)
    }

    /// Whether the filter accepts every provider
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::All(filters) if filters.iter().all(Self::is_pass_through))
    }
}

impl FilterCriteria<Provider> for ProviderFilter<'_> {
    fn meets_criteria(&self, provider: &Provider) -> bool {
        match self {
            Self::TypeSubtype(matches) => matches_type_subtype(provider, matches),
            Self::Status(statuses) => matches_status(provider, statuses),
            Self::All(filters) => filters.iter().all(|f| f.meets_criteria(provider)),
        }
    }
}

/// Apply a rule's filters to the scoped providers, preserving input order
#[must_use]
pub fn filter_providers<'p>(
    rule: &OrganisationGroupingConfiguration,
    providers: &'p [Provider],
) -> Vec<&'p Provider> {
    let filter = ProviderFilter::for_rule(rule);
    if filter.is_pass_through() {
        return providers.iter().collect();
    }

    providers
        .iter()
        .filter(|provider| filter.meets_criteria(provider))
        .collect()
}
