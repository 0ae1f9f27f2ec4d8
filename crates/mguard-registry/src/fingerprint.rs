//! # Fingerprint Engine
//!
//! This module maps a byte sequence to a deterministic 32-bit digest. The
//! registry uses it on every protect, update and verify call to decide
//! whether a region's contents moved since they were last acknowledged.
//!
//! ## Threat Model
//!
//! The fingerprint detects:
//!
//! - **Accidental corruption**: stray writes, off-by-one copies, use of a
//!   stale buffer.
//! - **Naive tampering**: a balance edited in place without going through
//!   the code path that acknowledges the change.
//!
//! It does NOT resist an attacker who can read the digest and craft a
//! colliding payload. Use a keyed MAC for that.
//!
//! ## How It Works
//!
//! ```text
//!   digest = 0
//!   for byte in bytes:
//!       digest = digest * 65599 + byte      (mod 2^32)
//! ```
//!
//! The multiplier is odd, so every step is a bijection on the accumulator
//! and a single changed byte always changes the digest. Order matters:
//! `ab` and `ba` hash differently.
//!
//! Leading zero bytes do not move a zero accumulator, so `[]`, `[0]` and
//! `[0, 0]` share the digest `0`. The registry stores each entry's size
//! next to its digest, so a length change is never judged by the digest
//! alone.
//!
//! ## References
//!
//! - Aho, Sethi, Ullman (1986) - "Compilers: Principles, Techniques, and
//!   Tools" - the multiplicative string hash used by early symbol tables.
//! - sdbm database library, public domain - origin of the 65599 constant.

/// Digest produced by the fingerprint engine.
pub type Digest = u32;

/// Multiplier applied to the accumulator before each byte is added.
pub const MULTIPLIER: Digest = 65_599;

/// Digest of the empty byte sequence.
pub const EMPTY_DIGEST: Digest = 0;

/// Computes the fingerprint of `bytes`.
///
/// O(len) time, no allocation.
///
/// # Example
///
/// ```rust
/// use mguard_registry::fingerprint::{fingerprint, EMPTY_DIGEST};
///
/// assert_eq!(fingerprint(b""), EMPTY_DIGEST);
/// assert_eq!(fingerprint(b"a"), 97);
/// assert_ne!(fingerprint(b"ab"), fingerprint(b"ba"));
/// ```
pub fn fingerprint(bytes: &[u8]) -> Digest {
    let mut fingerprinter = Fingerprinter::new();
    fingerprinter.update(bytes);
    fingerprinter.finish()
}

/// Incremental fingerprint computation.
///
/// Feeding the input in several chunks produces the same digest as a
/// single [`fingerprint`] call over the concatenation.
///
/// ```rust
/// use mguard_registry::fingerprint::{fingerprint, Fingerprinter};
///
/// let mut f = Fingerprinter::new();
/// f.update(b"account:");
/// f.update(b"000042");
/// assert_eq!(f.finish(), fingerprint(b"account:000042"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprinter {
    state: Digest,
}

impl Fingerprinter {
    /// Creates a fingerprinter seeded with [`EMPTY_DIGEST`].
    pub const fn new() -> Self {
        Self {
            state: EMPTY_DIGEST,
        }
    }

    /// Absorbs `bytes` into the running digest.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self
                .state
                .wrapping_mul(MULTIPLIER)
                .wrapping_add(Digest::from(byte));
        }
    }

    /// Returns the digest of everything absorbed so far.
    pub const fn finish(&self) -> Digest {
        self.state
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}
