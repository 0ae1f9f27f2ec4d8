//! Tracing subscriber setup.

use crate::config::LoggingConfig;
use crate::error::GuardError;
use crate::Result;
use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` wins over `config.filter` when set.
///
/// # Errors
///
/// Returns `GuardError::Logging` if the filter does not parse or a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| GuardError::Logging(e.to_string()))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| GuardError::Logging(format!("invalid filter '{}': {}", config.filter, e))),
    }
}
