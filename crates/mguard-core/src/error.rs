//! Error types for Memory Guard Core.

use thiserror::Error;

/// Core error type for guard operations.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Registry error passthrough.
    #[error("Registry error: {0}")]
    Registry(#[from] mguard_registry::RegistryError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration document.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}
