//! Run-scoped caches for external lookups
//!
//! Each generation run creates its own caches, so snapshots never leak
//! between runs with different provider version or snapshot ids. Both caches
//! are populated once, before any rule is processed, and are read-only from
//! then on.

pub mod master_data;
pub mod payment_organisations;

pub use master_data::{ProviderMasterData, ProviderMasterDataCache};
pub use payment_organisations::{PaymentOrganisationCache, PaymentOrganisationIndex};
