//! Provider records
//!
//! A provider is one funded or reportable institution: a school, an academy,
//! a trust or a local authority. Providers are immutable inputs to a run.

use serde::{Deserialize, Serialize};

/// Academy trust membership of a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustStatus {
    /// Not part of an academy trust
    #[default]
    NotApplicable,
    /// Sole academy of a single academy trust
    #[serde(rename = "SupportedByASingleAcademyTrust", alias = "SupportedByASingleAacademyTrust")]
    SupportedByASingleAcademyTrust,
    /// One of several academies in a multi-academy trust
    SupportedByAMultiAcademyTrust,
}

/// A provider record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Provider {
    pub provider_id: String,
    pub name: String,
    /// UK provider reference number, the primary national registration number
    pub ukprn: String,
    pub urn: Option<String>,
    pub upin: Option<String>,
    pub establishment_number: Option<String>,
    pub dfe_establishment_number: Option<String>,
    pub companies_house_number: Option<String>,
    /// Local authority name
    pub authority: Option<String>,
    pub la_code: Option<String>,
    pub provider_type: String,
    pub provider_sub_type: String,
    pub status: Option<String>,
    pub trust_status: TrustStatus,
    pub trust_code: Option<String>,
    pub trust_name: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub government_office_region_code: Option<String>,
    pub government_office_region_name: Option<String>,
    pub rsc_region_code: Option<String>,
    pub rsc_region_name: Option<String>,
    pub district_code: Option<String>,
    pub district_name: Option<String>,
    pub ward_code: Option<String>,
    pub ward_name: Option<String>,
    pub census_ward_code: Option<String>,
    pub census_ward_name: Option<String>,
    pub middle_super_output_area_code: Option<String>,
    pub middle_super_output_area_name: Option<String>,
    pub lower_super_output_area_code: Option<String>,
    pub lower_super_output_area_name: Option<String>,
    pub parliamentary_constituency_code: Option<String>,
    pub parliamentary_constituency_name: Option<String>,
    pub local_government_group_type_code: Option<String>,
    pub local_government_group_type_name: Option<String>,
    /// UKPRN of the organisation that is paid on this provider's behalf
    pub payment_organisation_identifier: Option<String>,
    pub payment_organisation_name: Option<String>,
}

impl Provider {
    /// Create a provider with the mandatory identity fields
    pub fn new(ukprn: impl Into<String>, name: impl Into<String>) -> Self {
        let ukprn = ukprn.into();
        Self {
            provider_id: ukprn.clone(),
            name: name.into(),
            ukprn,
            ..Self::default()
        }
    }

    /// Whether the provider is the sole academy of a single academy trust
    #[must_use]
    pub fn is_single_academy_trust_member(&self) -> bool {
        self.trust_status == TrustStatus::SupportedByASingleAcademyTrust
    }
}

/// Return the value if it holds anything other than whitespace
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `non_blank` for the provider's `Option<String>` fields
#[must_use]
pub fn non_blank_field(value: &Option<String>) -> Option<&str> {
    non_blank(value.as_deref())
}
