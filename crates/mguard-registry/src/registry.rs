//! # Registry - Protected Region Bookkeeping
//!
//! This module holds the [`Registry`]: an insertion-ordered list of
//! [`Entry`] records, one per protected region, plus the slot accounting for
//! its backing store.
//!
//! ## Threat Model
//!
//! | Threat | Defense |
//! |--------|---------|
//! | In-place edit of a trusted value | Fingerprint mismatch on verify |
//! | Checking a value that was never protected | Fail-closed: unknown is compromised |
//! | Re-registration to launder a tampered value | Duplicate protect is a no-op |
//! | Allocation failure during growth | Typed error, registry left unchanged |
//!
//! ## Lifecycle
//!
//! ```text
//!   Registry::new()          capacity 1, used 0
//!        │
//!        ▼
//!   protect(region) ───────▶ Entry { id, size, digest }   (append only)
//!        │
//!        ▼
//!   ... caller mutates the region ...
//!        │
//!        ├── verify / is_compromised   read-only comparison
//!        └── update                    acknowledge the change
//! ```
//!
//! Entries are never removed. Capacity grows by one logical slot per new
//! region once the initial slot is used, so successive protects report
//! 1, 2, 3, 4, ...
//!
//! ## Thread Safety
//!
//! `Registry` has no interior locking. Wrap it in a lock (see `mguard-core`)
//! for shared use; growth reallocates the entry vector.

use crate::fingerprint::{fingerprint, Digest};
use crate::models::{Entry, GrowthPolicy, Protection, RegistryError, Result, Update, VerifyResult};
use crate::region::{RegionId, RegionRef};
use std::collections::TryReserveError;
use tracing::{debug, trace};

/// Outcome of a `Vec::try_reserve*` call on the entry store.
type Reserved = std::result::Result<(), TryReserveError>;

/// Slots reserved by a freshly initialized registry.
pub const INITIAL_CAPACITY: usize = 1;

/// The protected-region registry.
///
/// # Example
///
/// ```rust
/// use mguard_registry::{Protection, RegionRef, Registry, Update};
///
/// let mut registry = Registry::new().unwrap();
/// let mut balance: i32 = 31337;
///
/// assert_eq!(
///     registry.protect(RegionRef::of(&balance)).unwrap(),
///     Protection::Protected { capacity: 1 }
/// );
///
/// balance = 34922;
/// assert!(registry.is_compromised(RegionRef::of(&balance)));
///
/// assert_eq!(
///     registry.update(RegionRef::of(&balance)).unwrap(),
///     Update::Updated { size: 4 }
/// );
/// assert!(!registry.is_compromised(RegionRef::of(&balance)));
/// ```
#[derive(Debug)]
pub struct Registry {
    /// Protected regions in insertion order.
    entries: Vec<Entry>,

    /// Logical slot count. Always `>= entries.len()`.
    capacity: usize,

    /// Reservation strategy used when a slot is added.
    growth: GrowthPolicy,
}

impl Registry {
    /// Creates a registry with one reserved slot and the default
    /// [`GrowthPolicy::Exact`].
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Allocation` if the initial slot cannot be
    /// reserved.
    pub fn new() -> Result<Self> {
        Self::with_growth(GrowthPolicy::default())
    }

    /// Creates a registry with one reserved slot and the given growth policy.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Allocation` if the initial slot cannot be
    /// reserved.
    pub fn with_growth(growth: GrowthPolicy) -> Result<Self> {
        let mut entries = Vec::new();
        reservation(entries.try_reserve_exact(INITIAL_CAPACITY), INITIAL_CAPACITY)?;

        Ok(Registry {
            entries,
            capacity: INITIAL_CAPACITY,
            growth,
        })
    }

    /// Registers a region.
    ///
    /// A region whose identity is already registered is left untouched and
    /// `Protection::AlreadyProtected` is returned, whatever its length.
    /// Otherwise the region is fingerprinted, appended, and the capacity
    /// after insertion is returned.
    ///
    /// Zero-length regions are accepted.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Allocation` if a new slot is needed and
    /// cannot be reserved. The registry is unchanged in that case.
    pub fn protect(&mut self, region: RegionRef<'_>) -> Result<Protection> {
        let id = region.id();

        if self.find(id).is_some() {
            debug!("Region {} already protected", id);
            return Ok(Protection::AlreadyProtected);
        }

        let digest = fingerprint(region.bytes());

        if self.entries.len() == self.capacity {
            self.grow()?;
        }

        self.entries.push(Entry {
            id,
            size: region.len(),
            digest,
        });

        debug!(
            "Protected region {} ({} bytes), capacity {}",
            id,
            region.len(),
            self.capacity
        );

        Ok(Protection::Protected {
            capacity: self.capacity,
        })
    }

    /// Acknowledges a legitimate change to a protected region.
    ///
    /// The fingerprint is recomputed over the size recorded at registration;
    /// bytes past that size are ignored.
    ///
    /// # Returns
    ///
    /// - `Update::Updated { size }` with the registered size
    /// - `Update::NotProtected` if the region is unknown (nothing is
    ///   registered implicitly)
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::RegionTooShort` if the view is shorter than
    /// the registered size. The stored digest is left unchanged.
    pub fn update(&mut self, region: RegionRef<'_>) -> Result<Update> {
        let id = region.id();

        let Some(position) = self.find(id) else {
            debug!("Update for unprotected region {}", id);
            return Ok(Update::NotProtected);
        };

        let entry = &mut self.entries[position];
        if region.len() < entry.size {
            return Err(RegistryError::RegionTooShort {
                id,
                expected: entry.size,
                actual: region.len(),
            });
        }

        let previous = entry.digest;
        entry.digest = fingerprint(&region.bytes()[..entry.size]);

        debug!(
            "Updated region {}: digest {:#010x} -> {:#010x}",
            id, previous, entry.digest
        );

        Ok(Update::Updated { size: entry.size })
    }

    /// Returns the position of `id` in insertion order, if registered.
    pub fn find(&self, id: RegionId) -> Option<usize> {
        let position = self.entries.iter().position(|entry| entry.id == id);
        trace!("Lookup {} -> {:?}", id, position);
        position
    }

    /// [`find`](Self::find) in numeric form: the position, or `-1`.
    pub fn find_code(&self, id: RegionId) -> isize {
        match self.find(id) {
            Some(position) => position as isize,
            None => -1,
        }
    }

    /// Checks a region against its registered fingerprint.
    ///
    /// Read-only: the stored entry is never modified.
    pub fn verify(&self, region: RegionRef<'_>) -> VerifyResult {
        let Some(position) = self.find(region.id()) else {
            return VerifyResult::Unknown;
        };

        let entry = &self.entries[position];
        if region.len() < entry.size {
            return VerifyResult::Truncated {
                expected_len: entry.size,
                actual_len: region.len(),
            };
        }

        let actual = fingerprint(&region.bytes()[..entry.size]);
        if actual == entry.digest {
            VerifyResult::Intact
        } else {
            VerifyResult::Tampered {
                expected: entry.digest,
                actual,
            }
        }
    }

    /// Returns `true` if the region changed since it was last acknowledged,
    /// or if it was never protected.
    pub fn is_compromised(&self, region: RegionRef<'_>) -> bool {
        match self.verify(region) {
            VerifyResult::Intact => false,
            // Unknown regions are never trusted.
            VerifyResult::Unknown => true,
            VerifyResult::Tampered { .. } | VerifyResult::Truncated { .. } => true,
        }
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: RegionId) -> bool {
        self.find(id).is_some()
    }

    /// Stored digest for `id`, if registered.
    pub fn digest_of(&self, id: RegionId) -> Option<Digest> {
        self.find(id).map(|position| self.entries[position].digest)
    }

    /// Entry at `position` in insertion order.
    pub fn entry(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of protected regions.
    pub fn used(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Logical slot count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn growth(&self) -> GrowthPolicy {
        self.growth
    }

    /// Adds one logical slot, reserving storage per the growth policy.
    fn grow(&mut self) -> Result<()> {
        let reserved = match self.growth {
            GrowthPolicy::Exact => self.entries.try_reserve_exact(1),
            GrowthPolicy::Amortized => self.entries.try_reserve(1),
        };
        self.commit_growth(reserved)
    }

    /// Counts the new slot only once its storage is reserved.
    fn commit_growth(&mut self, reserved: Reserved) -> Result<()> {
        reservation(reserved, 1)?;

        self.capacity += 1;
        debug!("Registry grown to {} slots", self.capacity);
        Ok(())
    }
}

fn reservation(reserved: Reserved, requested: usize) -> Result<()> {
    reserved.map_err(|source| RegistryError::Allocation { requested, source })
}
