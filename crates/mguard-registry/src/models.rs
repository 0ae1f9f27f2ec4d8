//! # Core Data Models for the Memory Guard Registry
//!
//! This module defines the record kept per protected region and the typed
//! outcomes of every registry operation.
//!
//! ## Threat Model
//!
//! The types in this module help defend against:
//!
//! - **Fail-open checks**: [`VerifyResult`] has exactly one safe variant;
//!   every other outcome, including an unknown region, is a compromise.
//! - **Sentinel-value confusion**: duplicate registration and unknown updates are
//!   distinct enum variants rather than a bare `0` the caller might read as
//!   a size or a capacity.
//! - **Silent allocation faults**: growth failures surface as
//!   [`RegistryError::Allocation`].

use crate::fingerprint::Digest;
use crate::region::RegionId;
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use thiserror::Error;

/// A protected region as recorded by the registry.
///
/// The entry names the caller's buffer by address and remembers how many
/// bytes were protected and their last acknowledged fingerprint. It never
/// holds the bytes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Identity of the caller's buffer.
    pub id: RegionId,

    /// Byte length fixed at registration.
    pub size: usize,

    /// Fingerprint as of the last protect or update.
    pub digest: Digest,
}

/// Outcome of [`Registry::protect`](crate::Registry::protect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// The region was added. Carries the registry capacity after growth.
    Protected {
        /// Slot count after the insertion.
        capacity: usize,
    },

    /// The identity was already registered; nothing changed.
    AlreadyProtected,
}

impl Protection {
    /// Numeric form: the new capacity, or `0` for a duplicate.
    pub fn code(&self) -> usize {
        match self {
            Self::Protected { capacity } => *capacity,
            Self::AlreadyProtected => 0,
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Protected { .. })
    }
}

/// Outcome of [`Registry::update`](crate::Registry::update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// The stored digest was refreshed over `size` bytes.
    Updated {
        /// Size recorded at registration.
        size: usize,
    },

    /// The identity is not registered. No entry was created.
    NotProtected,
}

impl Update {
    /// Numeric form: the stored size, or `0` when not protected.
    pub fn code(&self) -> usize {
        match self {
            Self::Updated { size } => *size,
            Self::NotProtected => 0,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Result of checking a region against its registered fingerprint.
///
/// # Variants
///
/// - `Intact`: contents match the last acknowledged fingerprint
/// - `Tampered`: contents changed without an update
/// - `Truncated`: the supplied view no longer covers the protected size
/// - `Unknown`: the region was never protected
///
/// # Security Notes
///
/// Only `Intact` is safe. `Unknown` is a compromise: absence of protection
/// never implies trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResult {
    /// Contents match the stored fingerprint.
    Intact,

    /// Contents differ from the stored fingerprint.
    Tampered {
        /// Fingerprint recorded at the last protect/update.
        expected: Digest,
        /// Fingerprint of the current contents.
        actual: Digest,
    },

    /// The view is shorter than the registered size.
    Truncated {
        /// Size recorded at registration.
        expected_len: usize,
        /// Length of the supplied view.
        actual_len: usize,
    },

    /// The region is not registered.
    Unknown,
}

impl VerifyResult {
    /// Returns `true` unless the region is verified intact.
    pub fn is_compromised(&self) -> bool {
        match self {
            Self::Intact => false,
            Self::Tampered { .. } | Self::Truncated { .. } | Self::Unknown => true,
        }
    }
}

/// How the backing store reserves memory when a new slot is needed.
///
/// Both policies report the same logical capacity sequence (1, 2, 3, ...);
/// they differ only in how much the underlying vector over-reserves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Reserve exactly one additional slot per growth.
    #[default]
    Exact,

    /// Let the vector grow geometrically.
    Amortized,
}

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Backing storage could not be grown.
    #[error("Allocation failed while reserving {requested} registry slot(s): {source}")]
    Allocation {
        /// Slots requested.
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// A view handed to `update` does not cover the registered size.
    #[error("Region {id} is {actual} bytes, registered as {expected}")]
    RegionTooShort {
        /// Region identity.
        id: RegionId,
        /// Size recorded at registration.
        expected: usize,
        /// Length of the supplied view.
        actual: usize,
    },
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
