//! Configuration for the organisation group generator.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GroupingError, Result};

/// Environment variable toggling rule-level parallelism
pub const ENV_PARALLEL: &str = "ORG_GROUPS_PARALLEL";

/// Environment variable capping the rule worker pool size
pub const ENV_MAX_PARALLELISM: &str = "ORG_GROUPS_MAX_PARALLELISM";

/// Configuration for the `OrganisationGroupGenerator`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Process rules concurrently once the run caches are populated
    pub parallel_rules: bool,
    /// Number of worker threads used for rule processing
    pub max_parallelism: usize,
    /// Provider type of the trust-level entity in provider master data
    pub multi_academy_trust_provider_type: String,
    /// Provider type of local authority entities in provider master data
    pub local_authority_provider_type: String,
    /// Provider subtype of local authority entities in provider master data
    pub local_authority_provider_subtype: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            parallel_rules: true,
            max_parallelism: num_cpus::get(),
            multi_academy_trust_provider_type: "Multi-academy trust".to_string(),
            local_authority_provider_type: "Local Authority".to_string(),
            local_authority_provider_subtype: "Local Authority".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GroupingError::InvalidConfiguration(format!(
                "Unable to read generator configuration {}: {e}",
                path.display()
            ))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            GroupingError::InvalidConfiguration(format!(
                "Unable to parse generator configuration {}: {e}",
                path.display()
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `ORG_GROUPS_PARALLEL` and `ORG_GROUPS_MAX_PARALLELISM` overrides
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(
            std::env::var(ENV_PARALLEL).ok().as_deref(),
            std::env::var(ENV_MAX_PARALLELISM).ok().as_deref(),
        )
    }

    fn with_overrides(
        mut self,
        parallel: Option<&str>,
        max_parallelism: Option<&str>,
    ) -> Result<Self> {
        if let Some(value) = parallel {
            self.parallel_rules = value.trim().parse().map_err(|_| {
                GroupingError::InvalidConfiguration(format!(
                    "{ENV_PARALLEL} must be 'true' or 'false', got '{value}'"
                ))
            })?;
        }

        if let Some(value) = max_parallelism {
            self.max_parallelism = value.trim().parse().map_err(|_| {
                GroupingError::InvalidConfiguration(format!(
                    "{ENV_MAX_PARALLELISM} must be a positive integer, got '{value}'"
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.max_parallelism == 0 {
            return Err(GroupingError::InvalidConfiguration(
                "max_parallelism must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            (
                "multi_academy_trust_provider_type",
                &self.multi_academy_trust_provider_type,
            ),
            (
                "local_authority_provider_type",
                &self.local_authority_provider_type,
            ),
            (
                "local_authority_provider_subtype",
                &self.local_authority_provider_subtype,
            ),
        ] {
            if value.trim().is_empty() {
                return Err(GroupingError::InvalidConfiguration(format!(
                    "{name} must not be blank"
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generator Configuration:")?;
        writeln!(f, "  Parallel Rules: {}", self.parallel_rules)?;
        writeln!(f, "  Max Parallelism: {}", self.max_parallelism)?;
        writeln!(
            f,
            "  Multi-Academy Trust Provider Type: {}",
            self.multi_academy_trust_provider_type
        )?;
        writeln!(
            f,
            "  Local Authority Provider Type/Subtype: {}/{}",
            self.local_authority_provider_type, self.local_authority_provider_subtype
        )
    }
}
