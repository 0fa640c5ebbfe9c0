//! Organisation group generation
//!
//! One run turns a list of grouping rules and the providers in scope into an
//! ordered list of organisation groups. External snapshots are fetched at most
//! once per run and before any rule is processed; after that each rule is
//! independent and may run on the rayon pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use super::key::resolve_grouping_key;
use super::lookup::TargetOrganisationLookup;
use super::partition::partition_by_key;
use crate::cache::{
    PaymentOrganisationCache, PaymentOrganisationIndex, ProviderMasterData,
    ProviderMasterDataCache,
};
use crate::config::GeneratorConfig;
use crate::error::{GroupingError, Result};
use crate::filter::filter_providers;
use crate::models::{
    FundingConfiguration, OrganisationGroupResult, OrganisationGroupingConfiguration,
    PaymentOrganisationSource, Provider, ProviderSource, summarise,
};
use crate::sources::{PaymentOrganisationRegistry, ProviderVersionSource};
use crate::utils::logging::log_operation_complete;

/// Inputs of one generation run
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Grouping rules, processed in order
    pub rules: &'a [OrganisationGroupingConfiguration],
    pub provider_source: ProviderSource,
    pub payment_organisation_source: PaymentOrganisationSource,
    /// Providers already scoped to the funding stream and period
    pub scoped_providers: &'a [Provider],
    pub provider_version_id: &'a str,
    /// Required when a payment-class rule resolves against the external registry
    pub provider_snapshot_id: Option<i32>,
}

impl GenerationRequest<'_> {
    /// Fail fast on missing arguments
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(GroupingError::invalid_argument(
                "rules",
                "at least one organisation grouping rule is required",
            ));
        }

        if self.provider_version_id.trim().is_empty() {
            return Err(GroupingError::invalid_argument(
                "provider_version_id",
                "must not be blank",
            ));
        }

        Ok(())
    }

    fn has_payment_rules(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.grouping_reason.is_payment_class())
    }

    /// Registry snapshot is consulted for payment-class rules on the external registry
    fn needs_payment_organisations(&self) -> bool {
        self.has_payment_rules() && self.provider_source.is_external_registry()
    }

    /// Master data is consulted for payment-class rules resolving organisations as
    /// providers
    fn needs_master_data(&self) -> bool {
        self.has_payment_rules()
            && self.payment_organisation_source
                == PaymentOrganisationSource::OrganisationAsProvider
    }
}

/// Generates organisation groups from grouping rules
pub struct OrganisationGroupGenerator {
    provider_versions: Arc<dyn ProviderVersionSource>,
    payment_organisations: Arc<dyn PaymentOrganisationRegistry>,
    config: GeneratorConfig,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl OrganisationGroupGenerator {
    /// Create a generator; the rule worker pool is sized from the configuration
    pub fn new(
        provider_versions: Arc<dyn ProviderVersionSource>,
        payment_organisations: Arc<dyn PaymentOrganisationRegistry>,
        config: GeneratorConfig,
    ) -> Result<Self> {
        config.validate()?;

        let pool = if config.parallel_rules {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_parallelism)
                .thread_name(|index| format!("org-groups-{index}"))
                .build()
                .map_err(|e| {
                    GroupingError::InvalidConfiguration(format!(
                        "Unable to build rule worker pool: {e}"
                    ))
                })?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self {
            provider_versions,
            payment_organisations,
            config,
            pool,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the groups of a funding configuration
    pub async fn generate_for_funding_configuration(
        &self,
        funding_configuration: &FundingConfiguration,
        scoped_providers: &[Provider],
        provider_version_id: &str,
        provider_snapshot_id: Option<i32>,
    ) -> Result<Vec<OrganisationGroupResult>> {
        funding_configuration.validate()?;

        info!(
            "Generating organisation groups for funding stream {} period {}",
            funding_configuration.funding_stream_id, funding_configuration.funding_period_id
        );

        self.generate(&GenerationRequest {
            rules: &funding_configuration.organisation_groupings,
            provider_source: funding_configuration.provider_source,
            payment_organisation_source: funding_configuration.payment_organisation_source,
            scoped_providers,
            provider_version_id,
            provider_snapshot_id,
        })
        .await
    }

    /// Generate the groups of every rule, in rule order then first-seen key order
    ///
    /// Any failure aborts the run and no partial results are returned. When
    /// several rules fail, the error of the earliest failing rule is reported.
    pub async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<Vec<OrganisationGroupResult>> {
        request.validate()?;

        let start = Instant::now();
        info!(
            "Generating organisation groups: {} rules over {} providers \
             (provider version {}, snapshot {})",
            request.rules.len(),
            request.scoped_providers.len(),
            request.provider_version_id,
            request
                .provider_snapshot_id
                .map_or_else(|| "none".to_string(), |id| id.to_string())
        );

        // The registry is loaded first so a duplicate snapshot fails before any lookup
        let payment_organisations = self.load_payment_organisations(request).await?;
        let master_data = self.load_master_data(request).await?;

        let batch = RuleBatch {
            rules: request.rules.to_vec(),
            providers: request.scoped_providers.to_vec(),
            provider_source: request.provider_source,
            payment_organisation_source: request.payment_organisation_source,
            provider_version_id: request.provider_version_id.to_string(),
            config: self.config.clone(),
            payment_organisations,
            master_data,
        };
        let pool = self.pool.clone();

        // Rule processing is CPU-bound, keep it off the async runtime
        let per_rule = tokio::task::spawn_blocking(move || batch.run(pool.as_deref())).await??;

        let results: Vec<OrganisationGroupResult> = per_rule.into_iter().flatten().collect();

        for ((code, reason), count) in summarise(&results) {
            info!("  {count} {code} groups for {reason}");
        }
        log_operation_complete(
            "generated",
            &format!("provider version {}", request.provider_version_id),
            results.len(),
            Some(start.elapsed()),
        );

        Ok(results)
    }

    async fn load_payment_organisations(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<Option<Arc<PaymentOrganisationIndex>>> {
        if !request.needs_payment_organisations() {
            return Ok(None);
        }

        let snapshot_id =
            request
                .provider_snapshot_id
                .ok_or_else(|| GroupingError::MissingProviderSnapshotId {
                    provider_version_id: request.provider_version_id.to_string(),
                })?;

        let cache = PaymentOrganisationCache::new(snapshot_id);
        cache
            .get_or_load(self.payment_organisations.as_ref())
            .await
            .map(Some)
    }

    async fn load_master_data(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<Option<Arc<ProviderMasterData>>> {
        if !request.needs_master_data() {
            return Ok(None);
        }

        let cache = ProviderMasterDataCache::new(request.provider_version_id);
        cache
            .get_or_load(self.provider_versions.as_ref())
            .await
            .map(Some)
    }
}

/// Owned inputs of the rule phase of one run
struct RuleBatch {
    rules: Vec<OrganisationGroupingConfiguration>,
    providers: Vec<Provider>,
    provider_source: ProviderSource,
    payment_organisation_source: PaymentOrganisationSource,
    provider_version_id: String,
    config: GeneratorConfig,
    payment_organisations: Option<Arc<PaymentOrganisationIndex>>,
    master_data: Option<Arc<ProviderMasterData>>,
}

impl RuleBatch {
    /// Groups of each rule, in rule order
    fn run(&self, pool: Option<&rayon::ThreadPool>) -> Result<Vec<Vec<OrganisationGroupResult>>> {
        let lookup = TargetOrganisationLookup::new(
            &self.config,
            &self.provider_version_id,
            self.provider_source,
            self.payment_organisation_source,
        )
        .with_payment_organisations(self.payment_organisations.as_deref())
        .with_master_data(self.master_data.as_deref());

        let process = |rule: &OrganisationGroupingConfiguration| {
            generate_for_rule(
                rule,
                &self.providers,
                self.payment_organisation_source,
                &lookup,
            )
        };

        match pool {
            Some(pool) if self.rules.len() > 1 => {
                // Rules after the earliest known failure are skipped; rules before it
                // still run so a lower-indexed failure can replace it
                let first_failure = AtomicUsize::new(usize::MAX);
                let outcomes: Vec<Option<Result<Vec<OrganisationGroupResult>>>> =
                    pool.install(|| {
                        self.rules
                            .par_iter()
                            .enumerate()
                            .map(|(index, rule)| {
                                if index > first_failure.load(Ordering::Relaxed) {
                                    return None;
                                }
                                let outcome = process(rule);
                                if outcome.is_err() {
                                    first_failure.fetch_min(index, Ordering::Relaxed);
                                }
                                Some(outcome)
                            })
                            .collect()
                    });

                outcomes.into_iter().flatten().collect()
            }
            _ => self.rules.iter().map(process).collect(),
        }
    }
}

/// Filter, partition and resolve the groups of a single rule
fn generate_for_rule(
    rule: &OrganisationGroupingConfiguration,
    providers: &[Provider],
    payment_organisation_source: PaymentOrganisationSource,
    lookup: &TargetOrganisationLookup<'_>,
) -> Result<Vec<OrganisationGroupResult>> {
    let key = resolve_grouping_key(
        rule.group_type_identifier,
        rule.organisation_group_type_code,
        rule.grouping_reason,
        payment_organisation_source,
    )?;

    let filtered = filter_providers(rule, providers);
    let partitions = partition_by_key(&filtered, key);

    let results = partitions
        .into_iter()
        .map(|partition| {
            let target = lookup.resolve(rule, partition.key, &partition.members)?;
            let members = partition.members.into_iter().cloned().collect();
            Ok(OrganisationGroupResult::new(rule, target, members))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "{} {} rule on {}: {} of {} providers filtered into {} groups",
        rule.grouping_reason,
        rule.organisation_group_type_code,
        rule.group_type_identifier,
        filtered.len(),
        providers.len(),
        results.len()
    );

    Ok(results)
}
