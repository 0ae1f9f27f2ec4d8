//! Configuration types for Memory Guard.

use crate::error::GuardError;
use crate::Result;
use mguard_registry::GrowthPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the [`Guard`](crate::Guard) facade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Registry configuration.
    pub registry: RegistryConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl GuardConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::Serialization` for malformed JSON and
    /// `GuardError::Config` if validation fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GuardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::Io` if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Checks field-level constraints.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.logging.filter.trim().is_empty() {
            return Err(GuardError::Config(
                "logging.filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the registry growth policy.
    #[must_use]
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.registry.growth = growth;
        self
    }

    /// Sets the tracing filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.logging.filter = filter.into();
        self
    }

    /// Enables or disables per-region audit logging.
    #[must_use]
    pub fn with_audit_logging(mut self, enabled: bool) -> Self {
        self.logging.audit_logging = enabled;
        self
    }
}

/// Registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Reservation strategy for new slots.
    pub growth: GrowthPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,

    /// Log every compromised region found during verification and audits.
    pub audit_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            audit_logging: true,
        }
    }
}
