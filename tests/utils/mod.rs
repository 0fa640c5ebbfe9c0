#![allow(dead_code)]

use std::sync::Arc;

use organisation_groups::{
    GeneratorConfig, GroupingReason, InMemoryPaymentOrganisationRegistry,
    InMemoryProviderVersionSource, OrganisationGroupGenerator, OrganisationGroupResult,
    OrganisationGroupTypeClassification, OrganisationGroupTypeCode,
    OrganisationGroupTypeIdentifier, OrganisationGroupingConfiguration, PaymentOrganisation,
    Provider, TrustStatus,
};

pub const PROVIDER_VERSION_ID: &str = "PSG-2024-25-v3";
pub const PROVIDER_SNAPSHOT_ID: i32 = 12345;

/// A plain academy with a UKPRN, name and status
#[must_use]
pub fn academy(ukprn: &str) -> Provider {
    Provider {
        provider_type: "Academies".to_string(),
        provider_sub_type: "Academy converter".to_string(),
        status: Some("Open".to_string()),
        ..Provider::new(ukprn, format!("Academy {ukprn}"))
    }
}

#[must_use]
pub fn with_la(mut provider: Provider, la_code: &str) -> Provider {
    provider.la_code = Some(la_code.to_string());
    provider.authority = Some(format!("Authority {la_code}"));
    provider
}

#[must_use]
pub fn with_country(mut provider: Provider, country_code: &str) -> Provider {
    provider.country_code = Some(country_code.to_string());
    provider.country_name = Some(format!("Country {country_code}"));
    provider
}

#[must_use]
pub fn with_trust(mut provider: Provider, trust_code: &str, trust_status: TrustStatus) -> Provider {
    provider.trust_code = Some(trust_code.to_string());
    provider.trust_name = Some(format!("Trust {trust_code}"));
    provider.trust_status = trust_status;
    provider
}

#[must_use]
pub fn with_payment_organisation(mut provider: Provider, identifier: &str, name: &str) -> Provider {
    provider.payment_organisation_identifier = Some(identifier.to_string());
    provider.payment_organisation_name = Some(name.to_string());
    provider
}

/// The local authority entity as it appears in provider master data
#[must_use]
pub fn local_authority(ukprn: &str, la_code: &str) -> Provider {
    Provider {
        provider_type: "Local Authority".to_string(),
        provider_sub_type: "Local Authority".to_string(),
        la_code: Some(la_code.to_string()),
        government_office_region_code: Some("E12000007".to_string()),
        country_code: Some("E92000001".to_string()),
        ..Provider::new(ukprn, format!("Local Authority {la_code}"))
    }
}

#[must_use]
pub fn payment_organisation(ukprn: &str, name: &str) -> PaymentOrganisation {
    PaymentOrganisation {
        provider_snapshot_id: PROVIDER_SNAPSHOT_ID,
        name: name.to_string(),
        ukprn: Some(ukprn.to_string()),
        organisation_type: "AcademyTrust".to_string(),
        ..PaymentOrganisation::default()
    }
}

#[must_use]
pub fn legal_entity_rule(
    reason: GroupingReason,
    identifier: OrganisationGroupTypeIdentifier,
    code: OrganisationGroupTypeCode,
) -> OrganisationGroupingConfiguration {
    OrganisationGroupingConfiguration::new(
        reason,
        OrganisationGroupTypeClassification::LegalEntity,
        identifier,
        code,
    )
}

#[must_use]
pub fn country_rule() -> OrganisationGroupingConfiguration {
    OrganisationGroupingConfiguration::new(
        GroupingReason::Information,
        OrganisationGroupTypeClassification::GeographicalBoundary,
        OrganisationGroupTypeIdentifier::CountryCode,
        OrganisationGroupTypeCode::Country,
    )
}

#[must_use]
pub fn sequential_config() -> GeneratorConfig {
    GeneratorConfig {
        parallel_rules: false,
        ..GeneratorConfig::default()
    }
}

#[must_use]
pub fn parallel_config() -> GeneratorConfig {
    GeneratorConfig {
        parallel_rules: true,
        max_parallelism: 4,
        ..GeneratorConfig::default()
    }
}

/// Build a generator over shared in-memory collaborators
pub fn generator(
    provider_versions: &Arc<InMemoryProviderVersionSource>,
    registry: &Arc<InMemoryPaymentOrganisationRegistry>,
    config: GeneratorConfig,
) -> OrganisationGroupGenerator {
    OrganisationGroupGenerator::new(provider_versions.clone(), registry.clone(), config)
        .expect("generator configuration is valid")
}

/// Collaborators with a master data version and no registry snapshots
#[must_use]
pub fn master_data(providers: Vec<Provider>) -> Arc<InMemoryProviderVersionSource> {
    Arc::new(InMemoryProviderVersionSource::new().with_version(PROVIDER_VERSION_ID, providers))
}

#[must_use]
pub fn empty_registry() -> Arc<InMemoryPaymentOrganisationRegistry> {
    Arc::new(InMemoryPaymentOrganisationRegistry::new())
}

/// UKPRNs of a result's member providers
#[must_use]
pub fn member_ukprns(result: &OrganisationGroupResult) -> Vec<&str> {
    result.providers.iter().map(|p| p.ukprn.as_str()).collect()
}
