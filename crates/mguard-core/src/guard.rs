//! The shared Guard facade.
//!
//! This module provides the main entry point for multi-threaded use. The
//! [`Guard`] wraps a [`Registry`] in a reader-writer lock and logs every
//! security-relevant outcome.

use crate::{
    audit::{AuditReport, FindingKind},
    config::GuardConfig,
    Result,
};

use mguard_registry::{Protection, RegionId, RegionRef, Registry, Update, VerifyResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use tracing::{debug, info, warn};

/// Point-in-time slot accounting for a guard's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Protected regions.
    pub used: usize,
    /// Logical slot count.
    pub capacity: usize,
}

/// The thread-safe Memory Guard facade.
///
/// # Locking
///
/// - `protect` and `update` take the write lock: appends may reallocate the
///   registry's backing store.
/// - `find`, `verify`, `is_compromised` and `audit` take the read lock and
///   may run concurrently with one another.
/// - `audit` drains its iterator before locking, so the iterator may call
///   back into the guard.
/// - `with_registry` runs its closure under the read lock. The closure must
///   not call back into the guard: a write deadlocks, and a nested read can
///   block behind a queued writer.
///
/// Share a guard across threads with `Arc<Guard>`.
///
/// # Security Model
///
/// The guard is fail-closed: an unknown region is compromised, and
/// `is_compromised` treats every non-intact outcome as a compromise.
///
/// # Example
///
/// ```rust
/// use mguard_core::{Guard, GuardConfig, RegionRef};
///
/// let guard = Guard::new(GuardConfig::default())?;
/// let mut balance: u64 = 250;
///
/// guard.protect(RegionRef::of(&balance))?;
/// balance -= 50;
/// assert!(guard.is_compromised(RegionRef::of(&balance)));
///
/// guard.update(RegionRef::of(&balance))?;
/// assert!(!guard.is_compromised(RegionRef::of(&balance)));
/// # Ok::<(), mguard_core::GuardError>(())
/// ```
pub struct Guard {
    /// Configuration.
    config: GuardConfig,

    /// Protected regions.
    registry: RwLock<Registry>,
}

impl Guard {
    /// Create a new Guard with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration is invalid
    /// - The registry's initial slot cannot be allocated
    pub fn new(config: GuardConfig) -> Result<Self> {
        config.validate()?;
        let registry = Registry::with_growth(config.registry.growth)?;

        info!(
            "Guard initialized with {:?} growth, capacity {}",
            config.registry.growth,
            registry.capacity()
        );

        Ok(Self {
            config,
            registry: RwLock::new(registry),
        })
    }

    /// Protect a region.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::Registry` if the registry cannot grow.
    pub fn protect(&self, region: RegionRef<'_>) -> Result<Protection> {
        Ok(self.registry.write().protect(region)?)
    }

    /// Acknowledge a legitimate change to a protected region.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::Registry` if the view is shorter than the
    /// registered size.
    pub fn update(&self, region: RegionRef<'_>) -> Result<Update> {
        let outcome = self.registry.write().update(region)?;
        if outcome == Update::NotProtected {
            warn!("Update refused for unprotected region {}", region.id());
        }
        Ok(outcome)
    }

    /// Position of `id` in the registry, if protected.
    pub fn find(&self, id: RegionId) -> Option<usize> {
        self.registry.read().find(id)
    }

    /// Verify a region against its registered fingerprint.
    pub fn verify(&self, region: RegionRef<'_>) -> VerifyResult {
        let result = self.registry.read().verify(region);
        self.log_result(region.id(), result);
        result
    }

    /// Returns true if the region changed without an update, or was never
    /// protected.
    pub fn is_compromised(&self, region: RegionRef<'_>) -> bool {
        self.verify(region).is_compromised()
    }

    /// Verify a batch of regions under a single read lock.
    ///
    /// Regions are checked in iteration order and reported in the same
    /// order.
    pub fn audit<'a, I>(&self, regions: I) -> AuditReport
    where
        I: IntoIterator<Item = RegionRef<'a>>,
    {
        let regions: Vec<RegionRef<'a>> = regions.into_iter().collect();

        let mut report = AuditReport::default();
        {
            let registry = self.registry.read();
            for region in regions {
                let result = registry.verify(region);
                self.log_result(region.id(), result);
                report.record(region.id(), result);
            }
        }

        if report.is_clean() {
            info!("Audit clean: {} regions intact", report.checked);
        } else {
            warn!(
                "Audit found {} compromised of {} regions",
                report.compromised(),
                report.checked
            );
        }
        report
    }

    /// Current slot accounting.
    pub fn stats(&self) -> RegistryStats {
        let registry = self.registry.read();
        RegistryStats {
            used: registry.used(),
            capacity: registry.capacity(),
        }
    }

    /// Run `f` with read access to the underlying registry.
    ///
    /// `f` runs under the read lock and must not call back into the guard.
    pub fn with_registry<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        f(&*self.registry.read())
    }

    /// Active configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    fn log_result(&self, id: RegionId, result: VerifyResult) {
        match FindingKind::from_result(result) {
            None => debug!("Region {} verified intact", id),
            Some(kind) if self.config.logging.audit_logging => {
                warn!("Region {} compromised: {}", id, kind);
            }
            Some(_) => {}
        }
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
