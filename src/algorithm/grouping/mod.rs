//! Organisation group generation
//!
//! A run filters the scoped providers per rule, partitions them by a grouping
//! key, and resolves each partition to a target organisation.

pub mod fields;
pub mod generator;
pub mod key;
pub mod lookup;
pub mod partition;

pub use fields::ProviderField;
pub use generator::{GenerationRequest, OrganisationGroupGenerator};
pub use key::resolve_grouping_key;
pub use lookup::TargetOrganisationLookup;
pub use partition::{ProviderPartition, partition_by_key};
