//! Filtering capabilities for provider records
//!
//! This module decides which scoped providers a grouping rule considers,
//! based on the rule's optional provider type/subtype and status allow-lists.

pub mod provider;

pub use provider::{
    FilterCriteria, ProviderFilter, filter_providers, matches_status, matches_type_subtype,
};
