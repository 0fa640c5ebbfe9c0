//! Grouping rule vocabulary
//!
//! This module defines the enums a funding configuration uses to describe an
//! organisation grouping rule, the rule itself, and the funding configuration
//! document that owns an ordered list of rules.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GroupingError, Result};

define_code_enum! {
    /// Why an organisation group is formed
    pub enum GroupingReason {
        /// The group is the organisation that gets paid
        Payment => "Payment",
        /// The group is used for reporting only
        Information => "Information",
        /// The group is the contracting organisation
        Contracting => "Contracting",
        /// The group receives indicative allocations
        Indicative => "Indicative",
    }
}

impl GroupingReason {
    /// Payment, Contracting and Indicative share key-extraction semantics
    #[must_use]
    pub const fn is_payment_class(self) -> bool {
        matches!(self, Self::Payment | Self::Contracting | Self::Indicative)
    }
}

define_code_enum! {
    /// Whether a group is a legal entity or a geographical boundary
    pub enum OrganisationGroupTypeClassification {
        /// Trusts, local authorities, providers
        LegalEntity => "LegalEntity",
        /// Wards, districts, regions and similar areas
        GeographicalBoundary => "GeographicalBoundary",
    }
}

define_code_enum! {
    /// Which provider attribute identifies a group
    pub enum OrganisationGroupTypeIdentifier {
        Ukprn => "UKPRN",
        AcademyTrustCode => "AcademyTrustCode",
        ParliamentaryConstituencyCode => "ParliamentaryConstituencyCode",
        MiddleSuperOutputAreaCode => "MiddleSuperOutputAreaCode",
        LowerSuperOutputAreaCode => "LowerSuperOutputAreaCode",
        CensusWardCode => "CensusWardCode",
        DistrictCode => "DistrictCode",
        WardCode => "WardCode",
        GovernmentOfficeRegionCode => "GovernmentOfficeRegionCode",
        RscRegionCode => "RscRegionCode",
        CountryCode => "CountryCode",
        LaCode => "LACode",
        LocalAuthorityClassificationTypeCode => "LocalAuthorityClassificationTypeCode",
        LocalGovernmentGroupTypeCode => "LocalGovernmentGroupTypeCode",
        PaymentOrganisationIdentifier => "PaymentOrganisationIdentifier",
        Urn => "URN",
        Upin => "UPIN",
        DfeEstablishmentNumber => "DfeEstablishmentNumber",
        CompaniesHouseNumber => "CompaniesHouseNumber",
    }
}

define_code_enum! {
    /// The semantic kind of an organisation group
    pub enum OrganisationGroupTypeCode {
        AcademyTrust => "AcademyTrust",
        LocalAuthority => "LocalAuthority",
        Provider => "Provider",
        ParliamentaryConstituency => "ParliamentaryConstituency",
        MiddleSuperOutputArea => "MiddleSuperOutputArea",
        LowerSuperOutputArea => "LowerSuperOutputArea",
        CensusWard => "CensusWard",
        District => "District",
        Ward => "Ward",
        GovernmentOfficeRegion => "GovernmentOfficeRegion",
        RscRegion => "RscRegion",
        Country => "Country",
        LocalAuthorityClassification => "LocalAuthorityClassification",
        LocalGovernmentGroup => "LocalGovernmentGroup",
    }
}

define_code_enum! {
    /// Where the canonical identity of a paid organisation comes from
    pub enum PaymentOrganisationSource {
        /// Payment organisation fields on the provider, resolved against the registry
        OrganisationFields => "PaymentOrganisationFields",
        /// The organisation is itself a provider in the master data
        OrganisationAsProvider => "PaymentOrganisationAsProvider",
    }
}

define_code_enum! {
    /// Which system supplied the provider data of a run
    pub enum ProviderSource {
        /// Internal provider master data
        Cfs => "CFS",
        /// External funding data zone registry
        Fdz => "FDZ",
    }
}

impl ProviderSource {
    /// Whether payment organisations live in the external registry
    #[must_use]
    pub const fn is_external_registry(self) -> bool {
        matches!(self, Self::Fdz)
    }
}

/// A provider type and subtype pair used to restrict a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTypeMatch {
    /// Provider type, compared case-insensitively
    pub provider_type: String,
    /// Provider subtype, compared case-insensitively
    pub provider_subtype: String,
}

impl ProviderTypeMatch {
    /// Create a type/subtype pair
    pub fn new(provider_type: impl Into<String>, provider_subtype: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            provider_subtype: provider_subtype.into(),
        }
    }
}

/// One organisation grouping rule from a funding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationGroupingConfiguration {
    /// Why the groups are formed
    pub grouping_reason: GroupingReason,
    /// Legal entity or geographical boundary
    pub group_type_classification: OrganisationGroupTypeClassification,
    /// Which provider attribute supplies the key
    pub group_type_identifier: OrganisationGroupTypeIdentifier,
    /// The semantic kind of group
    pub organisation_group_type_code: OrganisationGroupTypeCode,
    /// Optional provider type/subtype allow-list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_type_match: Option<Vec<ProviderTypeMatch>>,
    /// Optional provider status allow-list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<Vec<String>>,
}

impl OrganisationGroupingConfiguration {
    /// Create a rule without provider filters
    #[must_use]
    pub fn new(
        grouping_reason: GroupingReason,
        group_type_classification: OrganisationGroupTypeClassification,
        group_type_identifier: OrganisationGroupTypeIdentifier,
        organisation_group_type_code: OrganisationGroupTypeCode,
    ) -> Self {
        Self {
            grouping_reason,
            group_type_classification,
            group_type_identifier,
            organisation_group_type_code,
            provider_type_match: None,
            provider_status: None,
        }
    }

    /// Restrict the rule to providers matching one of the type/subtype pairs
    #[must_use]
    pub fn with_provider_type_match(mut self, matches: Vec<ProviderTypeMatch>) -> Self {
        self.provider_type_match = Some(matches);
        self
    }

    /// Restrict the rule to providers with one of the statuses
    #[must_use]
    pub fn with_provider_status<S: Into<String>>(
        mut self,
        statuses: impl IntoIterator<Item = S>,
    ) -> Self {
        self.provider_status = Some(statuses.into_iter().map(Into::into).collect());
        self
    }
}

/// The part of a funding configuration that drives organisation grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingConfiguration {
    /// Funding stream the configuration belongs to
    pub funding_stream_id: String,
    /// Funding period the configuration belongs to
    pub funding_period_id: String,
    /// System supplying provider data
    pub provider_source: ProviderSource,
    /// Where paid organisations are resolved from
    pub payment_organisation_source: PaymentOrganisationSource,
    /// Ordered grouping rules
    pub organisation_groupings: Vec<OrganisationGroupingConfiguration>,
}

impl FundingConfiguration {
    /// Load a funding configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GroupingError::InvalidConfiguration(format!(
                "Unable to read funding configuration {}: {e}",
                path.display()
            ))
        })?;

        let configuration: Self = serde_json::from_str(&content).map_err(|e| {
            GroupingError::InvalidConfiguration(format!(
                "Unable to parse funding configuration {}: {e}",
                path.display()
            ))
        })?;

        configuration.validate()?;
        Ok(configuration)
    }

    /// Check the document has an identity and at least one grouping rule
    pub fn validate(&self) -> Result<()> {
        if self.funding_stream_id.trim().is_empty() {
            return Err(GroupingError::InvalidConfiguration(
                "Funding configuration has no funding stream id".to_string(),
            ));
        }

        if self.funding_period_id.trim().is_empty() {
            return Err(GroupingError::InvalidConfiguration(format!(
                "Funding configuration for stream {} has no funding period id",
                self.funding_stream_id
            )));
        }

        if self.organisation_groupings.is_empty() {
            return Err(GroupingError::InvalidConfiguration(format!(
                "Funding configuration {}/{} has no organisation groupings",
                self.funding_stream_id, self.funding_period_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_class_reasons() {
        assert!(GroupingReason::Payment.is_payment_class());
        assert!(GroupingReason::Contracting.is_payment_class());
        assert!(GroupingReason::Indicative.is_payment_class());
        assert!(!GroupingReason::Information.is_payment_class());
    }

    #[test]
    fn codes_parse_case_insensitively() {
        let identifier: OrganisationGroupTypeIdentifier = "lacode".parse().unwrap();
        assert_eq!(identifier, OrganisationGroupTypeIdentifier::LaCode);
        assert_eq!(identifier.to_string(), "LACode");

        assert!("Parish".parse::<OrganisationGroupTypeCode>().is_err());
    }

    #[test]
    fn rule_deserialises_from_document_spelling() {
        let json = r#"{
            "groupingReason": "Payment",
            "groupTypeClassification": "LegalEntity",
            "groupTypeIdentifier": "UKPRN",
            "organisationGroupTypeCode": "AcademyTrust",
            "providerStatus": ["Open"]
        }"#;

        let rule: OrganisationGroupingConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(rule.group_type_identifier, OrganisationGroupTypeIdentifier::Ukprn);
        assert_eq!(rule.provider_status, Some(vec!["Open".to_string()]));
        assert!(rule.provider_type_match.is_none());
    }

    #[test]
    fn funding_configuration_requires_groupings() {
        let configuration = FundingConfiguration {
            funding_stream_id: "PSG".to_string(),
            funding_period_id: "AY-2425".to_string(),
            provider_source: ProviderSource::Cfs,
            payment_organisation_source: PaymentOrganisationSource::OrganisationAsProvider,
            organisation_groupings: Vec::new(),
        };

        assert!(matches!(
            configuration.validate(),
            Err(GroupingError::InvalidConfiguration(_))
        ));
    }
}
