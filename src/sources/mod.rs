//! External collaborators consulted during a generation run
//!
//! Provider master data and the payment organisation registry are remote
//! lookups owned by other services. The generator only needs one call on each,
//! so both are modelled as small object-safe async traits. Implementations
//! report failures (including non-success responses) as `anyhow::Error`;
//! retry policy belongs to them, not to the generator.

use futures::future::BoxFuture;

use crate::models::{PaymentOrganisation, Provider};

pub mod file;
pub mod memory;

pub use file::JsonRunInput;
pub use memory::{InMemoryPaymentOrganisationRegistry, InMemoryProviderVersionSource};

/// Source of provider master data snapshots
pub trait ProviderVersionSource: Send + Sync {
    /// Fetch every provider in a provider version
    fn get_providers_by_version<'a>(
        &'a self,
        provider_version_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Provider>>>;
}

/// Source of payment organisation registry snapshots
pub trait PaymentOrganisationRegistry: Send + Sync {
    /// Fetch every payment organisation in a provider snapshot
    fn get_all_organisations(
        &self,
        provider_snapshot_id: i32,
    ) -> BoxFuture<'_, anyhow::Result<Vec<PaymentOrganisation>>>;
}
