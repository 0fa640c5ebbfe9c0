//! Provider field accessors
//!
//! Key extraction and identity resolution both pick a provider attribute by
//! identifier type. Each accessor returns the attribute only when it holds a
//! non-blank value.

use crate::models::{OrganisationGroupTypeIdentifier, Provider, non_blank, non_blank_field};

/// Extracts one attribute of a provider
pub type ProviderField = for<'a> fn(&'a Provider) -> Option<&'a str>;

macro_rules! optional_fields {
    ($($fn_name:ident => $field:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name(provider: &Provider) -> Option<&str> {
                non_blank_field(&provider.$field)
            }
        )*
    };
}

pub(crate) fn ukprn(provider: &Provider) -> Option<&str> {
    non_blank(Some(provider.ukprn.as_str()))
}

pub(crate) fn name(provider: &Provider) -> Option<&str> {
    non_blank(Some(provider.name.as_str()))
}

optional_fields! {
    trust_code => trust_code,
    trust_name => trust_name,
    la_code => la_code,
    authority => authority,
    dfe_establishment_number => dfe_establishment_number,
    parliamentary_constituency_code => parliamentary_constituency_code,
    parliamentary_constituency_name => parliamentary_constituency_name,
    middle_super_output_area_code => middle_super_output_area_code,
    middle_super_output_area_name => middle_super_output_area_name,
    lower_super_output_area_code => lower_super_output_area_code,
    lower_super_output_area_name => lower_super_output_area_name,
    census_ward_code => census_ward_code,
    census_ward_name => census_ward_name,
    district_code => district_code,
    district_name => district_name,
    ward_code => ward_code,
    ward_name => ward_name,
    government_office_region_code => government_office_region_code,
    government_office_region_name => government_office_region_name,
    rsc_region_code => rsc_region_code,
    rsc_region_name => rsc_region_name,
    country_code => country_code,
    country_name => country_name,
    local_government_group_type_code => local_government_group_type_code,
    local_government_group_type_name => local_government_group_type_name,
    payment_organisation_identifier => payment_organisation_identifier,
    payment_organisation_name => payment_organisation_name,
}

/// The attribute holding an identifier type's value, for information grouping
///
/// Identifier types that only exist on registry records or individual
/// establishments have no entry.
#[must_use]
pub fn identifier_field(identifier: OrganisationGroupTypeIdentifier) -> Option<ProviderField> {
    use OrganisationGroupTypeIdentifier as Id;

    let field: ProviderField = match identifier {
        Id::Ukprn => ukprn,
        Id::AcademyTrustCode => trust_code,
        Id::LaCode => la_code,
        Id::ParliamentaryConstituencyCode => parliamentary_constituency_code,
        Id::MiddleSuperOutputAreaCode => middle_super_output_area_code,
        Id::LowerSuperOutputAreaCode => lower_super_output_area_code,
        Id::CensusWardCode => census_ward_code,
        Id::DistrictCode => district_code,
        Id::WardCode => ward_code,
        Id::GovernmentOfficeRegionCode => government_office_region_code,
        Id::RscRegionCode => rsc_region_code,
        Id::CountryCode => country_code,
        Id::LocalAuthorityClassificationTypeCode | Id::LocalGovernmentGroupTypeCode => {
            local_government_group_type_code
        }
        Id::PaymentOrganisationIdentifier
        | Id::Urn
        | Id::Upin
        | Id::DfeEstablishmentNumber
        | Id::CompaniesHouseNumber => return None,
    };

    Some(field)
}

/// The attribute holding a display name for an identifier type's value
///
/// `None` means the value has no richer label and is its own name.
#[must_use]
pub fn name_field(identifier: OrganisationGroupTypeIdentifier) -> Option<ProviderField> {
    use OrganisationGroupTypeIdentifier as Id;

    let field: ProviderField = match identifier {
        Id::Ukprn => name,
        Id::AcademyTrustCode => trust_name,
        Id::LaCode => authority,
        Id::ParliamentaryConstituencyCode => parliamentary_constituency_name,
        Id::MiddleSuperOutputAreaCode => middle_super_output_area_name,
        Id::LowerSuperOutputAreaCode => lower_super_output_area_name,
        Id::CensusWardCode => census_ward_name,
        Id::DistrictCode => district_name,
        Id::WardCode => ward_name,
        Id::GovernmentOfficeRegionCode => government_office_region_name,
        Id::RscRegionCode => rsc_region_name,
        Id::CountryCode => country_name,
        Id::LocalGovernmentGroupTypeCode => local_government_group_type_name,
        Id::LocalAuthorityClassificationTypeCode
        | Id::PaymentOrganisationIdentifier
        | Id::Urn
        | Id::Upin
        | Id::DfeEstablishmentNumber
        | Id::CompaniesHouseNumber => return None,
    };

    Some(field)
}

/// Attributes reported as alternate identifiers of information groups, in output order
pub(crate) const INFORMATION_ALTERNATE_IDENTIFIERS: &[OrganisationGroupTypeIdentifier] = &[
    OrganisationGroupTypeIdentifier::LaCode,
    OrganisationGroupTypeIdentifier::ParliamentaryConstituencyCode,
    OrganisationGroupTypeIdentifier::MiddleSuperOutputAreaCode,
    OrganisationGroupTypeIdentifier::LowerSuperOutputAreaCode,
    OrganisationGroupTypeIdentifier::CensusWardCode,
    OrganisationGroupTypeIdentifier::DistrictCode,
    OrganisationGroupTypeIdentifier::WardCode,
    OrganisationGroupTypeIdentifier::GovernmentOfficeRegionCode,
    OrganisationGroupTypeIdentifier::RscRegionCode,
    OrganisationGroupTypeIdentifier::CountryCode,
];
