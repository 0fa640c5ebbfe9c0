//! Payment organisation registry index
//!
//! Payment organisations are keyed by UKPRN. Within one provider snapshot a
//! UKPRN must be unique; the whole snapshot is scanned so a duplicate error
//! lists every offending UKPRN, not just the first.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use tokio::sync::OnceCell;

use crate::error::{GroupingError, Result};
use crate::models::{PaymentOrganisation, non_blank_field};
use crate::sources::PaymentOrganisationRegistry;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Payment organisations of one snapshot keyed by UKPRN
#[derive(Debug, Default)]
pub struct PaymentOrganisationIndex {
    provider_snapshot_id: i32,
    by_ukprn: FxHashMap<String, PaymentOrganisation>,
}

impl PaymentOrganisationIndex {
    /// Index a snapshot, failing if any UKPRN occurs more than once
    ///
    /// Records without a UKPRN cannot be resolved by key and are skipped.
    pub fn build(
        provider_snapshot_id: i32,
        organisations: Vec<PaymentOrganisation>,
    ) -> Result<Self> {
        let mut by_ukprn =
            FxHashMap::with_capacity_and_hasher(organisations.len(), Default::default());
        let mut duplicates = BTreeSet::new();
        let mut skipped = 0usize;

        for organisation in organisations {
            let Some(ukprn) = non_blank_field(&organisation.ukprn).map(str::to_string) else {
                skipped += 1;
                continue;
            };

            if by_ukprn.contains_key(&ukprn) {
                duplicates.insert(ukprn);
            } else {
                by_ukprn.insert(ukprn, organisation);
            }
        }

        if !duplicates.is_empty() {
            return Err(GroupingError::DuplicatePaymentOrganisation {
                snapshot_id: provider_snapshot_id,
                ukprns: duplicates.iter().join(", "),
            });
        }

        if skipped > 0 {
            log_warning(
                &format!("Skipped {skipped} payment organisations without a UKPRN"),
                Some(&format!("provider snapshot {provider_snapshot_id}")),
            );
        }

        Ok(Self {
            provider_snapshot_id,
            by_ukprn,
        })
    }

    #[must_use]
    pub fn provider_snapshot_id(&self) -> i32 {
        self.provider_snapshot_id
    }

    /// Look a payment organisation up by UKPRN
    #[must_use]
    pub fn resolve(&self, ukprn: &str) -> Option<&PaymentOrganisation> {
        self.by_ukprn.get(ukprn)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_ukprn.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_ukprn.is_empty()
    }
}

/// Fetches one registry snapshot at most once per run
#[derive(Debug)]
pub struct PaymentOrganisationCache {
    provider_snapshot_id: i32,
    cell: OnceCell<Arc<PaymentOrganisationIndex>>,
}

impl PaymentOrganisationCache {
    #[must_use]
    pub fn new(provider_snapshot_id: i32) -> Self {
        Self {
            provider_snapshot_id,
            cell: OnceCell::new(),
        }
    }

    /// The snapshot index, fetching and validating it on first use
    pub async fn get_or_load(
        &self,
        registry: &dyn PaymentOrganisationRegistry,
    ) -> Result<Arc<PaymentOrganisationIndex>> {
        self.cell
            .get_or_try_init(|| async {
                let subject = format!("provider snapshot {}", self.provider_snapshot_id);
                log_operation_start("Loading payment organisations for", &subject);
                let start = Instant::now();

                let organisations = registry
                    .get_all_organisations(self.provider_snapshot_id)
                    .await
                    .map_err(|e| {
                        GroupingError::upstream(
                            "get_all_organisations",
                            self.provider_snapshot_id,
                            e,
                        )
                    })?;

                let index =
                    PaymentOrganisationIndex::build(self.provider_snapshot_id, organisations)?;
                log_operation_complete("indexed", &subject, index.len(), Some(start.elapsed()));

                Ok::<_, GroupingError>(Arc::new(index))
            })
            .await
            .cloned()
    }

    /// The index if it has already been loaded
    #[must_use]
    pub fn get(&self) -> Option<Arc<PaymentOrganisationIndex>> {
        self.cell.get().cloned()
    }
}
