//! Error handling for organisation group generation.
//!
//! Every failure is fatal to a generation run. Variants carry the grouping key,
//! group type code, identifier type and snapshot or version id involved so a
//! caller can diagnose a failed run from the error alone.

use crate::models::{
    GroupingReason, OrganisationGroupTypeCode, OrganisationGroupTypeIdentifier,
    PaymentOrganisationSource,
};

/// Boxed source error carried by upstream failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while generating organisation groups
#[derive(Debug, thiserror::Error)]
pub enum GroupingError {
    /// A required argument was missing or empty
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Generator settings or a configuration document failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A payment-class rule named a group type code that has no payment key
    #[error(
        "Unsupported group type code for payment: {code} (reason {reason}, identifier {identifier})"
    )]
    UnsupportedGroupTypeCodeForPayment {
        /// Grouping reason of the rule
        reason: GroupingReason,
        /// Offending group type code
        code: OrganisationGroupTypeCode,
        /// Group type identifier of the rule
        identifier: OrganisationGroupTypeIdentifier,
    },

    /// An information rule named an identifier type with no provider field
    #[error("Unknown identifier for provider lookup: {identifier}")]
    UnknownIdentifierForProviderLookup {
        /// Offending identifier type
        identifier: OrganisationGroupTypeIdentifier,
    },

    /// No key extraction exists for this combination of rule settings
    #[error(
        "Unsupported grouping: reason {reason}, group type code {code}, identifier {identifier}, payment organisation source {source_kind}"
    )]
    UnsupportedGroupingCombination {
        /// Grouping reason of the rule
        reason: GroupingReason,
        /// Group type code of the rule
        code: OrganisationGroupTypeCode,
        /// Group type identifier of the rule
        identifier: OrganisationGroupTypeIdentifier,
        /// Payment organisation source of the run
        source_kind: PaymentOrganisationSource,
    },

    /// The identifier value of a group could not be derived from its members
    #[error("Unable to resolve field to identifier value for {identifier} (key '{key}')")]
    UnresolvableIdentifierField {
        /// Identifier type of the rule
        identifier: OrganisationGroupTypeIdentifier,
        /// Grouping key of the partition
        key: String,
    },

    /// Payment-class rules against the external registry need a snapshot id
    #[error(
        "Provider snapshot id is required when payment organisations are resolved from the external registry (provider version '{provider_version_id}')"
    )]
    MissingProviderSnapshotId {
        /// Provider version of the run
        provider_version_id: String,
    },

    /// The same UKPRN occurs more than once in one registry snapshot
    #[error("Duplicate payment organisation UKPRN(s) [{ukprns}] in provider snapshot {snapshot_id}")]
    DuplicatePaymentOrganisation {
        /// Snapshot that contained the duplicates
        snapshot_id: i32,
        /// Every duplicated UKPRN, comma separated
        ukprns: String,
    },

    /// No master-data provider matched the partition key
    #[error(
        "Unable to find target organisation for key '{key}' with group type code {code} and identifier {identifier} in provider version '{provider_version_id}'"
    )]
    TargetOrganisationNotFound {
        /// Grouping key of the partition
        key: String,
        /// Group type code of the rule
        code: OrganisationGroupTypeCode,
        /// Group type identifier of the rule
        identifier: OrganisationGroupTypeIdentifier,
        /// Provider version searched
        provider_version_id: String,
    },

    /// More than one master-data provider matched the partition key
    #[error(
        "Ambiguous target organisation for key '{key}' with group type code {code} and identifier {identifier} in provider version '{provider_version_id}': {matches} providers matched ({ukprns})"
    )]
    AmbiguousTargetOrganisation {
        /// Grouping key of the partition
        key: String,
        /// Group type code of the rule
        code: OrganisationGroupTypeCode,
        /// Group type identifier of the rule
        identifier: OrganisationGroupTypeIdentifier,
        /// Provider version searched
        provider_version_id: String,
        /// Number of matching providers
        matches: usize,
        /// UKPRNs of the matching providers
        ukprns: String,
    },

    /// A rule worker panicked or was cancelled before finishing
    #[error("Rule processing did not complete: {0}")]
    RuleWorker(#[from] tokio::task::JoinError),

    /// An external collaborator call did not succeed
    #[error("Upstream call '{operation}' failed for '{id}'")]
    Upstream {
        /// Name of the collaborator operation
        operation: &'static str,
        /// Version or snapshot id passed to it
        id: String,
        /// Underlying failure
        #[source]
        source: BoxError,
    },
}

impl GroupingError {
    /// Create an invalid argument error
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Wrap a collaborator failure with the operation and id it was called with
    pub fn upstream(operation: &'static str, id: impl ToString, source: anyhow::Error) -> Self {
        Self::Upstream {
            operation,
            id: id.to_string(),
            source: source.into(),
        }
    }

    /// Whether the error was caused by rule or generator configuration
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_)
                | Self::UnsupportedGroupTypeCodeForPayment { .. }
                | Self::UnknownIdentifierForProviderLookup { .. }
                | Self::UnsupportedGroupingCombination { .. }
                | Self::UnresolvableIdentifierField { .. }
                | Self::MissingProviderSnapshotId { .. }
        )
    }
}

/// Result type for organisation group operations
pub type Result<T> = std::result::Result<T, GroupingError>;
