//! A Rust library for generating organisation groups from funding
//! configuration grouping rules, with run-scoped provider master data and
//! payment organisation registry lookups.

pub mod algorithm;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::GeneratorConfig;
pub use error::{GroupingError, Result};

// Generation
pub use algorithm::grouping::{
    GenerationRequest, OrganisationGroupGenerator, TargetOrganisationLookup, partition_by_key,
    resolve_grouping_key,
};

// Domain models
pub use models::{
    FundingConfiguration, GroupingReason, OrganisationGroupResult,
    OrganisationGroupTypeClassification, OrganisationGroupTypeCode,
    OrganisationGroupTypeIdentifier, OrganisationGroupingConfiguration, OrganisationIdentifier,
    PaymentOrganisation, PaymentOrganisationSource, Provider, ProviderSource, ProviderTypeMatch,
    TargetOrganisationGroup, TrustStatus, searchable_name, summarise,
};

// Collaborators
pub use sources::{
    InMemoryPaymentOrganisationRegistry, InMemoryProviderVersionSource, JsonRunInput,
    PaymentOrganisationRegistry, ProviderVersionSource,
};
