//! Audit report types for batch verification.

use mguard_registry::{Digest, RegionId, VerifyResult};
use serde::{Deserialize, Serialize};

/// Summary of verifying a batch of regions.
///
/// Produced by [`Guard::audit`](crate::Guard::audit). A report is clean only
/// when every checked region verified intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Regions examined.
    pub checked: usize,

    /// Regions that verified intact.
    pub intact: usize,

    /// One entry per region that did not verify, in input order.
    pub findings: Vec<Finding>,
}

impl AuditReport {
    /// Returns true if no region was compromised.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of compromised regions.
    pub fn compromised(&self) -> usize {
        self.findings.len()
    }

    pub(crate) fn record(&mut self, region: RegionId, result: VerifyResult) {
        self.checked += 1;
        match FindingKind::from_result(result) {
            None => self.intact += 1,
            Some(kind) => self.findings.push(Finding { region, kind }),
        }
    }
}

/// A region that failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Identity of the offending region.
    pub region: RegionId,

    /// Why the region is considered compromised.
    pub kind: FindingKind,
}

/// Reasons a region is considered compromised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingKind {
    /// Contents changed without an update.
    Tampered {
        /// Stored fingerprint.
        expected: Digest,
        /// Fingerprint of the current contents.
        actual: Digest,
    },

    /// View shorter than the registered size.
    Truncated {
        /// Registered size.
        expected_len: usize,
        /// Supplied length.
        actual_len: usize,
    },

    /// Region was never protected.
    Unknown,
}

impl FindingKind {
    /// Maps a verification outcome to a finding; `None` for intact regions.
    pub fn from_result(result: VerifyResult) -> Option<Self> {
        match result {
            VerifyResult::Intact => None,
            VerifyResult::Tampered { expected, actual } => {
                Some(Self::Tampered { expected, actual })
            }
            VerifyResult::Truncated {
                expected_len,
                actual_len,
            } => Some(Self::Truncated {
                expected_len,
                actual_len,
            }),
            VerifyResult::Unknown => Some(Self::Unknown),
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tampered { expected, actual } => {
                write!(f, "Tampered: expected {:#010x}, got {:#010x}", expected, actual)
            }
            Self::Truncated {
                expected_len,
                actual_len,
            } => {
                write!(f, "Truncated: {} of {} bytes", actual_len, expected_len)
            }
            Self::Unknown => write!(f, "Unknown region"),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.region, self.kind)
    }
}
