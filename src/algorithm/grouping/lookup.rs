//! Target organisation lookup
//!
//! Resolves the canonical identity of one provider partition. Payment-class
//! rules resolve against either the payment organisation registry or the
//! provider master data, depending on the run's payment organisation source.
//! Information rules read the identity off the partition's first member.

use itertools::Itertools;

use super::fields::{self, INFORMATION_ALTERNATE_IDENTIFIERS};
use crate::cache::{PaymentOrganisationIndex, ProviderMasterData};
use crate::config::GeneratorConfig;
use crate::error::{GroupingError, Result};
use crate::models::organisation::IdentifierListBuilder;
use crate::models::{
    OrganisationGroupTypeCode, OrganisationGroupTypeIdentifier, OrganisationGroupingConfiguration,
    OrganisationIdentifier, PaymentOrganisationSource, Provider, ProviderSource,
    TargetOrganisationGroup,
};

/// Read-only view of everything a lookup needs during one run
#[derive(Debug, Clone, Copy)]
pub struct TargetOrganisationLookup<'a> {
    config: &'a GeneratorConfig,
    provider_version_id: &'a str,
    provider_source: ProviderSource,
    payment_organisation_source: PaymentOrganisationSource,
    payment_organisations: Option<&'a PaymentOrganisationIndex>,
    master_data: Option<&'a ProviderMasterData>,
}

impl<'a> TargetOrganisationLookup<'a> {
    #[must_use]
    pub fn new(
        config: &'a GeneratorConfig,
        provider_version_id: &'a str,
        provider_source: ProviderSource,
        payment_organisation_source: PaymentOrganisationSource,
    ) -> Self {
        Self {
            config,
            provider_version_id,
            provider_source,
            payment_organisation_source,
            payment_organisations: None,
            master_data: None,
        }
    }

    /// Attach the run's payment organisation registry index
    #[must_use]
    pub fn with_payment_organisations(
        mut self,
        index: Option<&'a PaymentOrganisationIndex>,
    ) -> Self {
        self.payment_organisations = index;
        self
    }

    /// Attach the run's provider master data
    #[must_use]
    pub fn with_master_data(mut self, master_data: Option<&'a ProviderMasterData>) -> Self {
        self.master_data = master_data;
        self
    }

    /// Resolve the identity of the partition `members` sharing `key` under `rule`
    pub fn resolve(
        &self,
        rule: &OrganisationGroupingConfiguration,
        key: &str,
        members: &[&Provider],
    ) -> Result<TargetOrganisationGroup> {
        let Some(&representative) = members.first() else {
            return Err(GroupingError::invalid_argument(
                "members",
                format!("partition '{key}' has no member providers"),
            ));
        };

        if !rule.grouping_reason.is_payment_class() {
            return resolve_information(rule.group_type_identifier, key, representative);
        }

        match self.payment_organisation_source {
            PaymentOrganisationSource::OrganisationFields => Ok(self.resolve_from_registry(
                rule.organisation_group_type_code,
                key,
                representative,
            )),
            PaymentOrganisationSource::OrganisationAsProvider => {
                self.resolve_from_master_data(rule, key, members)
            }
        }
    }

    /// Identity from the member's payment organisation fields, enriched from the registry
    ///
    /// A registry miss leaves the identifier list empty; this path never fails.
    fn resolve_from_registry(
        &self,
        code: OrganisationGroupTypeCode,
        key: &str,
        representative: &Provider,
    ) -> TargetOrganisationGroup {
        let (identifier, name) = if code == OrganisationGroupTypeCode::Provider {
            (
                fields::ukprn(representative).unwrap_or(key),
                fields::name(representative).unwrap_or(key),
            )
        } else {
            (
                fields::payment_organisation_identifier(representative).unwrap_or(key),
                fields::payment_organisation_name(representative).unwrap_or(key),
            )
        };

        let identifiers = self
            .payment_organisations
            .filter(|_| self.provider_source.is_external_registry())
            .and_then(|index| index.resolve(key))
            .map(|organisation| organisation.identifiers())
            .unwrap_or_default();

        TargetOrganisationGroup {
            identifier: identifier.to_string(),
            name: name.to_string(),
            identifiers: Some(identifiers),
        }
    }

    /// Identity of the single master-data provider matching the key
    fn resolve_from_master_data(
        &self,
        rule: &OrganisationGroupingConfiguration,
        key: &str,
        members: &[&Provider],
    ) -> Result<TargetOrganisationGroup> {
        let code = rule.organisation_group_type_code;
        let master_data = self.master_data.ok_or_else(|| {
            GroupingError::invalid_argument(
                "master_data",
                format!("provider master data is required to resolve {code} group '{key}'"),
            )
        })?;

        let candidates: Vec<&Provider> = match code {
            OrganisationGroupTypeCode::AcademyTrust => {
                let single_academy_trust =
                    matches!(members, [only] if only.is_single_academy_trust_member());

                if single_academy_trust {
                    master_data.with_trust_code(key).collect()
                } else {
                    let trust_type = &self.config.multi_academy_trust_provider_type;
                    master_data
                        .with_trust_code(key)
                        .filter(|p| p.provider_type.eq_ignore_ascii_case(trust_type))
                        .collect()
                }
            }
            OrganisationGroupTypeCode::LocalAuthority => {
                let la_type = &self.config.local_authority_provider_type;
                let la_subtype = &self.config.local_authority_provider_subtype;
                master_data
                    .with_la_code(key)
                    .filter(|p| {
                        p.provider_type.eq_ignore_ascii_case(la_type)
                            && p.provider_sub_type.eq_ignore_ascii_case(la_subtype)
                    })
                    .collect()
            }
            OrganisationGroupTypeCode::Provider => master_data.with_ukprn(key).collect(),
            code => {
                return Err(GroupingError::UnsupportedGroupTypeCodeForPayment {
                    reason: rule.grouping_reason,
                    code,
                    identifier: rule.group_type_identifier,
                });
            }
        };

        let target = self.single_match(rule, key, &candidates)?;

        Ok(TargetOrganisationGroup {
            identifier: target.ukprn.clone(),
            name: target.name.clone(),
            identifiers: Some(provider_identifiers(target)),
        })
    }

    fn single_match<'p>(
        &self,
        rule: &OrganisationGroupingConfiguration,
        key: &str,
        candidates: &[&'p Provider],
    ) -> Result<&'p Provider> {
        match candidates {
            [target] => Ok(*target),
            [] => Err(GroupingError::TargetOrganisationNotFound {
                key: key.to_string(),
                code: rule.organisation_group_type_code,
                identifier: rule.group_type_identifier,
                provider_version_id: self.provider_version_id.to_string(),
            }),
            _ => Err(GroupingError::AmbiguousTargetOrganisation {
                key: key.to_string(),
                code: rule.organisation_group_type_code,
                identifier: rule.group_type_identifier,
                provider_version_id: self.provider_version_id.to_string(),
                matches: candidates.len(),
                ukprns: candidates.iter().map(|p| p.ukprn.as_str()).join(", "),
            }),
        }
    }
}

/// Alternate identifiers of a provider resolved as a payment organisation
fn provider_identifiers(provider: &Provider) -> Vec<OrganisationIdentifier> {
    IdentifierListBuilder::new()
        .push(OrganisationGroupTypeIdentifier::Ukprn, fields::ukprn(provider))
        .push(OrganisationGroupTypeIdentifier::LaCode, fields::la_code(provider))
        .push(
            OrganisationGroupTypeIdentifier::DfeEstablishmentNumber,
            fields::dfe_establishment_number(provider),
        )
        .push(
            OrganisationGroupTypeIdentifier::GovernmentOfficeRegionCode,
            fields::government_office_region_code(provider),
        )
        .push(
            OrganisationGroupTypeIdentifier::CountryCode,
            fields::country_code(provider),
        )
        .build()
}

fn resolve_information(
    identifier_type: OrganisationGroupTypeIdentifier,
    key: &str,
    representative: &Provider,
) -> Result<TargetOrganisationGroup> {
    let identifier = fields::identifier_field(identifier_type)
        .and_then(|field| field(representative))
        .ok_or_else(|| GroupingError::UnresolvableIdentifierField {
            identifier: identifier_type,
            key: key.to_string(),
        })?;

    let name = fields::name_field(identifier_type)
        .and_then(|field| field(representative))
        .unwrap_or(key);

    // Local government classifications are not geographic and carry no alternates
    let identifiers = match identifier_type {
        OrganisationGroupTypeIdentifier::LocalAuthorityClassificationTypeCode
        | OrganisationGroupTypeIdentifier::LocalGovernmentGroupTypeCode => None,
        _ => {
            let mut builder = IdentifierListBuilder::new();
            for &alternate in INFORMATION_ALTERNATE_IDENTIFIERS {
                if alternate == identifier_type {
                    continue;
                }
                let value =
                    fields::identifier_field(alternate).and_then(|field| field(representative));
                builder.push(alternate, value);
            }
            Some(builder.build())
        }
    };

    Ok(TargetOrganisationGroup {
        identifier: identifier.to_string(),
        name: name.to_string(),
        identifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupingReason, OrganisationGroupTypeClassification, TrustStatus};

    fn rule(
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

    fn academy(ukprn: &str, trust_code: &str, trust_status: TrustStatus) -> Provider {
        Provider {
            trust_code: Some(trust_code.to_string()),
            trust_status,
            provider_type: "Academies".to_string(),
            ..Provider::new(ukprn, format!("Academy {ukprn}"))
        }
    }

    fn trust(ukprn: &str, trust_code: &str) -> Provider {
        Provider {
            trust_code: Some(trust_code.to_string()),
            provider_type: "Multi-academy trust".to_string(),
            la_code: Some("202".to_string()),
            country_code: Some("E92000001".to_string()),
            ..Provider::new(ukprn, format!("Trust {ukprn}"))
        }
    }

    #[test]
    fn multi_academy_trust_resolves_to_trust_level_entity() {
        let config = GeneratorConfig::default();
        let master_data = ProviderMasterData::new(vec![
            academy("1", "55", TrustStatus::SupportedByAMultiAcademyTrust),
            academy("2", "55", TrustStatus::SupportedByAMultiAcademyTrust),
            trust("5000", "55"),
        ]);
        let lookup = TargetOrganisationLookup::new(
            &config,
            "v1",
            ProviderSource::Cfs,
            PaymentOrganisationSource::OrganisationAsProvider,
        )
        .with_master_data(Some(&master_data));

        let a = academy("1", "55", TrustStatus::SupportedByAMultiAcademyTrust);
        let b = academy("2", "55", TrustStatus::SupportedByAMultiAcademyTrust);
        let target = lookup
            .resolve(
                &rule(
                    GroupingReason::Payment,
                    OrganisationGroupTypeIdentifier::Ukprn,
                    OrganisationGroupTypeCode::AcademyTrust,
                ),
                "55",
                &[&a, &b],
            )
            .unwrap();

        assert_eq!(target.identifier, "5000");
        assert_eq!(target.name, "Trust 5000");
        assert_eq!(
            target.identifiers,
            Some(vec![
                OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::Ukprn, "5000"),
                OrganisationIdentifier::new(OrganisationGroupTypeIdentifier::LaCode, "202"),
                OrganisationIdentifier::new(
                    OrganisationGroupTypeIdentifier::CountryCode,
                    "E92000001"
                ),
            ])
        );
    }

    #[test]
    fn unsupported_payment_code_fails() {
        let config = GeneratorConfig::default();
        let master_data = ProviderMasterData::default();
        let lookup = TargetOrganisationLookup::new(
            &config,
            "v1",
            ProviderSource::Cfs,
            PaymentOrganisationSource::OrganisationAsProvider,
        )
        .with_master_data(Some(&master_data));
        let member = Provider::new("1", "One");

        let err = lookup
            .resolve(
                &rule(
                    GroupingReason::Contracting,
                    OrganisationGroupTypeIdentifier::WardCode,
                    OrganisationGroupTypeCode::Ward,
                ),
                "W1",
                &[&member],
            )
            .unwrap_err();

        assert!(matches!(
            err,
            GroupingError::UnsupportedGroupTypeCodeForPayment {
                reason: GroupingReason::Contracting,
                code: OrganisationGroupTypeCode::Ward,
                identifier: OrganisationGroupTypeIdentifier::WardCode,
            }
        ));
    }

    #[test]
    fn information_identity_comes_from_first_member() {
        let config = GeneratorConfig::default();
        let lookup = TargetOrganisationLookup::new(
            &config,
            "v1",
            ProviderSource::Cfs,
            PaymentOrganisationSource::OrganisationFields,
        );
        let first = Provider {
            district_code: Some("D1".to_string()),
            district_name: Some("Riverside".to_string()),
            la_code: Some("101".to_string()),
            ward_code: Some(" ".to_string()),
            ..Provider::new("1", "One")
        };
        let second = Provider {
            district_code: Some("D1".to_string()),
            district_name: Some("Other label".to_string()),
            ..Provider::new("2", "Two")
        };

        let target = lookup
            .resolve(
                &rule(
                    GroupingReason::Information,
                    OrganisationGroupTypeIdentifier::DistrictCode,
                    OrganisationGroupTypeCode::District,
                ),
                "D1",
                &[&first, &second],
            )
            .unwrap();

        assert_eq!(target.identifier, "D1");
        assert_eq!(target.name, "Riverside");
        assert_eq!(
            target.identifiers,
            Some(vec![OrganisationIdentifier::new(
                OrganisationGroupTypeIdentifier::LaCode,
                "101"
            )])
        );
    }

    #[test]
    fn local_government_classification_has_no_alternates() {
        let config = GeneratorConfig::default();
        let lookup = TargetOrganisationLookup::new(
            &config,
            "v1",
            ProviderSource::Cfs,
            PaymentOrganisationSource::OrganisationFields,
        );
        let member = Provider {
            local_government_group_type_code: Some("Metropolitan".to_string()),
            local_government_group_type_name: Some("Metropolitan authorities".to_string()),
            la_code: Some("101".to_string()),
            ..Provider::new("1", "One")
        };

        let target = lookup
            .resolve(
                &rule(
                    GroupingReason::Information,
                    OrganisationGroupTypeIdentifier::LocalAuthorityClassificationTypeCode,
                    OrganisationGroupTypeCode::LocalAuthorityClassification,
                ),
                "Metropolitan",
                &[&member],
            )
            .unwrap();

        assert_eq!(target.name, "Metropolitan");
        assert_eq!(target.identifiers, None);
    }
}
