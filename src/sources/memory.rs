//! In-memory collaborators
//!
//! Backed by plain maps; used by the CLI once a run input document is loaded
//! and by tests. Each source counts the calls it receives.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::{BoxFuture, FutureExt};

use super::{PaymentOrganisationRegistry, ProviderVersionSource};
use crate::models::{PaymentOrganisation, Provider};

/// Provider versions held in memory
#[derive(Debug, Default)]
pub struct InMemoryProviderVersionSource {
    versions: HashMap<String, Vec<Provider>>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl InMemoryProviderVersionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a provider version
    #[must_use]
    pub fn with_version(
        mut self,
        provider_version_id: impl Into<String>,
        providers: Vec<Provider>,
    ) -> Self {
        self.versions.insert(provider_version_id.into(), providers);
        self
    }

    /// Make every call fail with the given message
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of calls received so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProviderVersionSource for InMemoryProviderVersionSource {
    fn get_providers_by_version<'a>(
        &'a self,
        provider_version_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Provider>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let result = match (&self.failure, self.versions.get(provider_version_id)) {
            (Some(message), _) => Err(anyhow::anyhow!("{message}")),
            (None, Some(providers)) => Ok(providers.clone()),
            (None, None) => Err(anyhow::anyhow!(
                "Provider version '{provider_version_id}' not found"
            )),
        };

        async move { result }.boxed()
    }
}

/// Payment organisation snapshots held in memory
#[derive(Debug, Default)]
pub struct InMemoryPaymentOrganisationRegistry {
    snapshots: HashMap<i32, Vec<PaymentOrganisation>>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl InMemoryPaymentOrganisationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a snapshot
    #[must_use]
    pub fn with_snapshot(
        mut self,
        provider_snapshot_id: i32,
        organisations: Vec<PaymentOrganisation>,
    ) -> Self {
        self.snapshots.insert(provider_snapshot_id, organisations);
        self
    }

    /// Make every call fail with the given message
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of calls received so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentOrganisationRegistry for InMemoryPaymentOrganisationRegistry {
    fn get_all_organisations(
        &self,
        provider_snapshot_id: i32,
    ) -> BoxFuture<'_, anyhow::Result<Vec<PaymentOrganisation>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let result = match (&self.failure, self.snapshots.get(&provider_snapshot_id)) {
            (Some(message), _) => Err(anyhow::anyhow!("{message}")),
            (None, Some(organisations)) => Ok(organisations.clone()),
            (None, None) => Err(anyhow::anyhow!(
                "Provider snapshot {provider_snapshot_id} not found"
            )),
        };

        async move { result }.boxed()
    }
}
