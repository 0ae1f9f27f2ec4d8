//! # Memory Guard Core
//!
//! Thread-safe facade over the Memory Guard registry.
//! Adds locking, configuration, batch audits and tracing setup.
//!
//! ## Threat Coverage
//!
//! | Layer | Component | Threats Caught |
//! |-------|-----------|----------------|
//! | Region | Registry | In-place edits, stray writes, unregistered reads |
//! | Batch | Audit | Any compromised region among many, reported together |
//! | Concurrency | Guard lock | Verification racing a registry reallocation |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    MEMORY GUARD CORE                    │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                         │
//! │   GuardConfig ───▶ ┌─────────────────┐                  │
//! │                    │      Guard      │  ← Arc-shared    │
//! │                    │ RwLock<Registry>│                  │
//! │                    └────────┬────────┘                  │
//! │           write lock        │        read lock          │
//! │     ┌───────────────────────┼──────────────────────┐    │
//! │     ▼                       ▼                      ▼    │
//! │  protect / update        verify / find          audit   │
//! │                                                         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mguard_core::{Guard, GuardConfig, RegionRef};
//! use std::sync::Arc;
//!
//! let guard = Arc::new(Guard::new(GuardConfig::default())?);
//! let accounts = [100i64, 200, 300];
//!
//! for account in &accounts {
//!     guard.protect(RegionRef::of(account))?;
//! }
//!
//! let report = guard.audit(accounts.iter().map(RegionRef::of));
//! assert!(report.is_clean());
//! # Ok::<(), mguard_core::GuardError>(())
//! ```
//!
//! ## Security Notes
//!
//! - Unknown regions are compromised; there is no allow-unknown switch
//! - A verification result is only as fresh as the lock that produced it
//! - Regions must stay at a fixed address while protected

mod audit;
mod config;
mod error;
mod guard;
pub mod telemetry;

pub use audit::{AuditReport, Finding, FindingKind};
pub use config::{GuardConfig, LoggingConfig, RegistryConfig};
pub use error::GuardError;
pub use guard::{Guard, RegistryStats};

// Re-export registry types for convenience
pub use mguard_registry::{
    fingerprint, Digest, GrowthPolicy, Plain, Protection, RegionId, RegionRef, Registry, Update,
    VerifyResult,
};

/// Core result type for guard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
