//! Provider master data for target organisation lookups

use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashMap;
use tokio::sync::OnceCell;

use crate::error::{GroupingError, Result};
use crate::models::{Provider, non_blank, non_blank_field};
use crate::sources::ProviderVersionSource;
use crate::utils::logging::{log_operation_complete, log_operation_start};

type PositionIndex = FxHashMap<String, Vec<usize>>;

/// A provider version indexed by the fields target lookups match on
#[derive(Debug, Default)]
pub struct ProviderMasterData {
    providers: Vec<Provider>,
    by_ukprn: PositionIndex,
    by_trust_code: PositionIndex,
    by_la_code: PositionIndex,
}

impl ProviderMasterData {
    /// Index a provider version
    #[must_use]
    pub fn new(providers: Vec<Provider>) -> Self {
        let mut by_ukprn = PositionIndex::default();
        let mut by_trust_code = PositionIndex::default();
        let mut by_la_code = PositionIndex::default();

        for (position, provider) in providers.iter().enumerate() {
            if let Some(ukprn) = non_blank(Some(provider.ukprn.as_str())) {
                by_ukprn.entry(ukprn.to_string()).or_default().push(position);
            }
            if let Some(trust_code) = non_blank_field(&provider.trust_code) {
                by_trust_code
                    .entry(trust_code.to_string())
                    .or_default()
                    .push(position);
            }
            if let Some(la_code) = non_blank_field(&provider.la_code) {
                by_la_code.entry(la_code.to_string()).or_default().push(position);
            }
        }

        Self {
            providers,
            by_ukprn,
            by_trust_code,
            by_la_code,
        }
    }

    /// Number of providers in the version
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Providers whose UKPRN equals the key
    pub fn with_ukprn<'a>(&'a self, ukprn: &str) -> impl Iterator<Item = &'a Provider> + 'a {
        self.positions(&self.by_ukprn, ukprn)
    }

    /// Providers whose academy trust code equals the key
    pub fn with_trust_code<'a>(
        &'a self,
        trust_code: &str,
    ) -> impl Iterator<Item = &'a Provider> + 'a {
        self.positions(&self.by_trust_code, trust_code)
    }

    /// Providers whose local authority code equals the key
    pub fn with_la_code<'a>(&'a self, la_code: &str) -> impl Iterator<Item = &'a Provider> + 'a {
        self.positions(&self.by_la_code, la_code)
    }

    fn positions<'a>(
        &'a self,
        index: &'a PositionIndex,
        key: &str,
    ) -> impl Iterator<Item = &'a Provider> + 'a {
        index
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&position| &self.providers[position])
    }
}

/// Fetches one provider version at most once per run
#[derive(Debug)]
pub struct ProviderMasterDataCache {
    provider_version_id: String,
    cell: OnceCell<Arc<ProviderMasterData>>,
}

impl ProviderMasterDataCache {
    #[must_use]
    pub fn new(provider_version_id: impl Into<String>) -> Self {
        Self {
            provider_version_id: provider_version_id.into(),
            cell: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn provider_version_id(&self) -> &str {
        &self.provider_version_id
    }

    /// The master data, fetching it on first use
    pub async fn get_or_load(
        &self,
        source: &dyn ProviderVersionSource,
    ) -> Result<Arc<ProviderMasterData>> {
        self.cell
            .get_or_try_init(|| async {
                log_operation_start(
                    "Loading provider master data for version",
                    &self.provider_version_id,
                );
                let start = Instant::now();

                let providers = source
                    .get_providers_by_version(&self.provider_version_id)
                    .await
                    .map_err(|e| {
                        GroupingError::upstream(
                            "get_providers_by_version",
                            &self.provider_version_id,
                            e,
                        )
                    })?;

                let master_data = ProviderMasterData::new(providers);
                log_operation_complete(
                    "loaded",
                    &format!("provider version {}", self.provider_version_id),
                    master_data.len(),
                    Some(start.elapsed()),
                );

                Ok::<_, GroupingError>(Arc::new(master_data))
            })
            .await
            .cloned()
    }

    /// The master data if it has already been loaded
    #[must_use]
    pub fn get(&self) -> Option<Arc<ProviderMasterData>> {
        self.cell.get().cloned()
    }
}
