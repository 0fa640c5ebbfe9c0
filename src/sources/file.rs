//! JSON run input documents
//!
//! A run input bundles everything one generation run needs: the funding
//! configuration, the scoped providers, the provider version master data and
//! the payment organisation registry snapshot. The CLI reads one of these and
//! serves the collaborator calls from memory.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::memory::{InMemoryPaymentOrganisationRegistry, InMemoryProviderVersionSource};
use crate::models::{FundingConfiguration, PaymentOrganisation, Provider};

/// Everything needed for one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRunInput {
    pub funding_configuration: FundingConfiguration,
    pub provider_version_id: String,
    #[serde(default)]
    pub provider_snapshot_id: Option<i32>,
    /// Providers in scope for the funding stream and period
    pub scoped_providers: Vec<Provider>,
    /// Full provider version; defaults to the scoped providers when absent
    #[serde(default)]
    pub provider_master_data: Option<Vec<Provider>>,
    #[serde(default)]
    pub payment_organisations: Vec<PaymentOrganisation>,
}

impl JsonRunInput {
    /// Read and validate a run input document
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read run input {}", path.display()))?;

        let input: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse run input {}", path.display()))?;

        input
            .funding_configuration
            .validate()
            .with_context(|| format!("Invalid funding configuration in {}", path.display()))?;

        Ok(input)
    }

    /// Build the in-memory collaborators serving this document
    #[must_use]
    pub fn sources(&self) -> (InMemoryProviderVersionSource, InMemoryPaymentOrganisationRegistry) {
        let master_data = self
            .provider_master_data
            .clone()
            .unwrap_or_else(|| self.scoped_providers.clone());

        let provider_versions = InMemoryProviderVersionSource::new()
            .with_version(self.provider_version_id.clone(), master_data);

        let mut registry = InMemoryPaymentOrganisationRegistry::new();
        if let Some(snapshot_id) = self.provider_snapshot_id {
            registry = registry.with_snapshot(snapshot_id, self.payment_organisations.clone());
        }

        (provider_versions, registry)
    }
}
