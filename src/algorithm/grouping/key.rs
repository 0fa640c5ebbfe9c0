//! Grouping key resolution
//!
//! Maps a rule's (identifier type, group type code, grouping reason) and the
//! run's payment organisation source to the provider attribute whose value
//! groups providers together.

use super::fields::{self, ProviderField};
use crate::error::{GroupingError, Result};
use crate::models::{
    GroupingReason, OrganisationGroupTypeCode, OrganisationGroupTypeIdentifier,
    PaymentOrganisationSource,
};

/// Resolve the key extractor for a rule
///
/// Decision order:
/// 1. payment-class reason with group type `Provider` keys on UKPRN;
/// 2. payment-class reason with organisations as providers keys on the trust
///    code or local authority code of the group type;
/// 3. payment-class reason with organisation fields keys on the provider's
///    payment organisation identifier;
/// 4. information reason keys on the identifier type's attribute.
pub fn resolve_grouping_key(
    identifier: OrganisationGroupTypeIdentifier,
    code: OrganisationGroupTypeCode,
    reason: GroupingReason,
    source: PaymentOrganisationSource,
) -> Result<ProviderField> {
    use OrganisationGroupTypeCode as Code;
    use PaymentOrganisationSource as Source;

    match (reason.is_payment_class(), code, source) {
        (true, Code::Provider, _) => Ok(fields::ukprn),
        (true, Code::AcademyTrust, Source::OrganisationAsProvider) => Ok(fields::trust_code),
        (true, Code::LocalAuthority, Source::OrganisationAsProvider) => Ok(fields::la_code),
        (true, code, Source::OrganisationAsProvider) => {
            Err(GroupingError::UnsupportedGroupTypeCodeForPayment {
                reason,
                code,
                identifier,
            })
        }
        (true, _, Source::OrganisationFields) => Ok(fields::payment_organisation_identifier),
        (false, ..) if reason == GroupingReason::Information => fields::identifier_field(identifier)
            .ok_or(GroupingError::UnknownIdentifierForProviderLookup { identifier }),
        _ => Err(GroupingError::UnsupportedGroupingCombination {
            reason,
            code,
            identifier,
            source_kind: source,
        }),
    }
}
