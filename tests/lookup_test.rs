mod utils;

use organisation_groups::cache::{PaymentOrganisationIndex, ProviderMasterData};
use organisation_groups::{
    GeneratorConfig, GroupingError, GroupingReason, OrganisationGroupTypeCode,
    OrganisationGroupTypeIdentifier, OrganisationIdentifier, PaymentOrganisation,
    PaymentOrganisationSource, Provider, ProviderSource, Result, TargetOrganisationLookup,
    TrustStatus,
};

use utils::{
    academy, legal_entity_rule, local_authority, payment_organisation, with_la,
    with_payment_organisation,
};

#[test]
fn test_information_by_ukprn_lists_alternates() -> Result<()> {
    let config = GeneratorConfig::default();
    let lookup = TargetOrganisationLookup::new(
        &config,
        utils::PROVIDER_VERSION_ID,
        ProviderSource::Cfs,
        PaymentOrganisationSource::OrganisationAsProvider,
    );
    let provider = Provider {
        ward_code: Some("E05000001".to_string()),
        country_code: Some("E92000001".to_string()),
        ..with_la(academy("1001"), "101")
    };

    let target = lookup.resolve(
        &legal_entity_rule(
            GroupingReason::Information,
            OrganisationGroupTypeIdentifier::Ukprn,
            OrganisationGroupTypeCode::Provider,
        ),
        "1001",
        &[&provider],
    )?;

    assert_eq!(target.identifier, "1001");
    assert_eq!(target.name, "Academy 1001");
    assert_eq!(
        target.identifiers,
        Some(vec![
            OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::LaCode, "101"),
            OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::WardCode, "E05000001"),
            OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::CountryCode, "E92000001"),
        ])
    );

    Ok(())
}

#[test]
fn test_information_name_falls_back_to_key() -> Result<()> {
    let config = GeneratorConfig::default();
    let lookup = TargetOrganisationLookup::new(
        &config,
        utils::PROVIDER_VERSION_ID,
        ProviderSource::Cfs,
        PaymentOrganisationSource::OrganisationFields,
    );
    let provider = Provider {
        ward_code: Some("E05000001".to_string()),
        ward_name: Some(String::new()),
        ..academy("1")
    };

    let target = lookup.resolve(
        &legal_entity_rule(
            GroupingReason::Information,
            OrganisationGroupTypeIdentifier::WardCode,
            OrganisationGroupTypeCode::Ward,
        ),
        "E05000001",
        &[&provider],
    )?;

    assert_eq!(target.identifier, "E05000001");
    assert_eq!(target.name, "E05000001");
    assert_eq!(target.identifiers, Some(Vec::new()));

    Ok(())
}

#[test]
fn test_local_government_group_has_no_identifier_list() -> Result<()> {
    let config = GeneratorConfig::default();
    let lookup = TargetOrganisationLookup::new(
        &config,
        utils::PROVIDER_VERSION_ID,
        ProviderSource::Cfs,
        PaymentOrganisationSource::OrganisationFields,
    );
    let provider = Provider {
        local_government_group_type_code: Some("LondonBorough".to_string()),
        local_government_group_type_name: Some("London Borough".to_string()),
        ..with_la(academy("1"), "202")
    };

    let target = lookup.resolve(
        &legal_entity_rule(
            GroupingReason::Information,
            OrganisationGroupTypeIdentifier::LocalGovernmentGroupTypeCode,
            OrganisationGroupTypeCode::LocalGovernmentGroup,
        ),
        "LondonBorough",
        &[&provider],
    )?;

    assert_eq!(target.identifier, "LondonBorough");
    assert_eq!(target.name, "London Borough");
    assert_eq!(target.identifiers, None);

    Ok(())
}

#[test]
fn test_information_without_identifier_field_fails() {
    let config = GeneratorConfig::default();
    let lookup = TargetOrganisationLookup::new(
        &config,
        utils::PROVIDER_VERSION_ID,
        ProviderSource::Cfs,
        PaymentOrganisationSource::OrganisationFields,
    );
    let provider = academy("1");

    let err = lookup
        .resolve(
            &legal_entity_rule(
                GroupingReason::Information,
                OrganisationGroupTypeIdentifier::Upin,
                OrganisationGroupTypeCode::Provider,
            ),
            "U1",
            &[&provider],
        )
        .unwrap_err();

    match err {
        GroupingError::UnresolvableIdentifierField { identifier, key } => {
            assert_eq!(identifier, OrganisationGroupTypeIdentifier::Upin);
            assert_eq!(key, "U1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_registry_provider_group_uses_member_identity() -> Result<()> {
    let config = GeneratorConfig::default();
    let index = PaymentOrganisationIndex::build(
        utils::PROVIDER_SNAPSHOT_ID,
        vec![PaymentOrganisation {
            urn: Some("140001".to_string()),
            la_code: Some("101".to_string()),
            ..payment_organisation("1001", "Hill Primary Academy Ltd")
        }],
    )?;
    let lookup = TargetOrganisationLookup::new(
        &config,
        utils::PROVIDER_VERSION_ID,
        ProviderSource::Fdz,
        PaymentOrganisationSource::OrganisationFields,
    )
    .with_payment_organisations(Some(&index));
    let provider = with_payment_organisation(academy("1001"), "9001", "Oak Trust");

    let target = lookup.resolve(
        &legal_entity_rule(
            GroupingReason::Payment,
            OrganisationGroupTypeIdentifier::Ukprn,
            OrganisationGroupTypeCode::Provider,
        ),
        "1001",
        &[&provider],
    )?;

    assert_eq!(target.identifier, "1001");
    assert_eq!(target.name, "Academy 1001");
    assert_eq!(
        target.identifiers,
        Some(vec![
            OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::Ukprn, "1001"),
            OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::Urn, "140001"),
            OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::LaCode, "101"),
        ])
    );

    Ok(())
}

#[test]
fn test_local_authority_requires_matching_subtype() {
    let config = GeneratorConfig::default();
    let mut wrong_subtype = local_authority("7777", "101");
    wrong_subtype.provider_sub_type = "Local authority maintained school".to_string();
    let master_data = ProviderMasterData::new(vec![wrong_subtype]);
    let lookup = TargetOrganisationLookup::new(
        &config,
        utils::PROVIDER_VERSION_ID,
        ProviderSource::Cfs,
        PaymentOrganisationSource::OrganisationAsProvider,
    )
    .with_master_data(Some(&master_data));
    let member = with_la(academy("1"), "101");

    let err = lookup
        .resolve(
            &legal_entity_rule(
                GroupingReason::Payment,
                OrganisationGroupTypeIdentifier::Ukprn,
                OrganisationGroupTypeCode::LocalAuthority,
            ),
            "101",
            &[&member],
        )
        .unwrap_err();

    assert!(matches!(
        err,
        GroupingError::TargetOrganisationNotFound {
            ref key,
            code: OrganisationGroupTypeCode::LocalAuthority,
            identifier: OrganisationGroupTypeIdentifier::Ukprn,
            ref provider_version_id,
        } if key == "101" && provider_version_id == utils::PROVIDER_VERSION_ID
    ));
}

#[test]
fn test_master_data_identity_lists_dfe_establishment_number() -> Result<()> {
    let config = GeneratorConfig::default();
    let trust = Provider {
        dfe_establishment_number: Some("2024".to_string()),
        establishment_number: Some("9999".to_string()),
        trust_code: Some("55".to_string()),
        provider_type: "Academy trust".to_string(),
        ..with_la(academy("5000"), "202")
    };
    let member = Provider {
        trust_status: TrustStatus::SupportedByASingleAcademyTrust,
        trust_code: Some("55".to_string()),
        ..academy("1")
    };
    let master_data = ProviderMasterData::new(vec![trust]);
    let lookup = TargetOrganisationLookup::new(
        &config,
        utils::PROVIDER_VERSION_ID,
        ProviderSource::Cfs,
        PaymentOrganisationSource::OrganisationAsProvider,
    )
    .with_master_data(Some(&master_data));

    let target = lookup.resolve(
        &legal_entity_rule(
            GroupingReason::Payment,
            OrganisationGroupTypeIdentifier::Ukprn,
            OrganisationGroupTypeCode::AcademyTrust,
        ),
        "55",
        &[&member],
    )?;

    assert_eq!(target.identifier, "5000");
    assert_eq!(
        target.identifiers,
        Some(vec![
            OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::Ukprn, "5000"),
            OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::LaCode, "202"),
            OrganisationIdentifier::new(
                OrganisationGroupTypeIdentifier::DfeEstablishmentNumber,
                "2024"
            ),
        ])
    );

    Ok(())
}

#[test]
fn test_master_data_lookup_without_master_data_fails() {
    let config = GeneratorConfig::default();
    let lookup = TargetOrganisationLookup::new(
        &config,
        utils::PROVIDER_VERSION_ID,
        ProviderSource::Cfs,
        PaymentOrganisationSource::OrganisationAsProvider,
    );
    let member = academy("1");

    let err = lookup
        .resolve(
            &legal_entity_rule(
                GroupingReason::Indicative,
                OrganisationGroupTypeIdentifier::Ukprn,
                OrganisationGroupTypeCode::Provider,
            ),
            "1",
            &[&member],
        )
        .unwrap_err();

    assert!(matches!(err, GroupingError::InvalidArgument { name: "master_data", .. }));
}
