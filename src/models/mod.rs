//! Domain models for organisation group generation
//!
//! This module contains the provider records, grouping rule vocabulary,
//! payment organisation registry records and generated group results.

#[macro_use]
mod macros;

pub mod grouping;
pub mod organisation;
pub mod provider;
pub mod result;

// Re-export commonly used types
pub use grouping::{
    FundingConfiguration, GroupingReason, OrganisationGroupTypeClassification,
    OrganisationGroupTypeCode, OrganisationGroupTypeIdentifier, OrganisationGroupingConfiguration,
    PaymentOrganisationSource, ProviderSource, ProviderTypeMatch,
};
pub use organisation::{OrganisationIdentifier, PaymentOrganisation, TargetOrganisationGroup};
pub use provider::{Provider, TrustStatus, non_blank, non_blank_field};
pub use result::{OrganisationGroupResult, searchable_name, summarise};
