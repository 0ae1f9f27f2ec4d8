//! # Memory Guard Registry - Live Region Integrity Checks
//!
//! The registry lets a program protect regions of its own memory, later ask
//! whether those regions changed without authorization, and acknowledge
//! changes it made on purpose. It targets the window between reading a value
//! (an account balance, a transfer record) and trusting it again.
//!
//! ## Purpose
//!
//! This crate implements three capabilities:
//!
//! 1. **Fingerprinting** - A cheap, deterministic digest over a byte region.
//!
//! 2. **Identity Tracking** - Regions are named by address through borrowed
//!    views, so the registry never copies or owns the protected bytes.
//!
//! 3. **Fail-Closed Verification** - A region that was never protected is
//!    reported as compromised, never as safe.
//!
//! ## Threat Model
//!
//! | Threat | Description | Defense |
//! |--------|-------------|---------|
//! | Silent Edit | Value rewritten in place | Fingerprint mismatch |
//! | Stray Write | Corruption from a neighbouring bug | Fingerprint mismatch |
//! | Unregistered Read | Trusting data never placed under guard | Unknown = compromised |
//! | Re-registration | Protecting a tampered value again to reset it | Duplicate protect is a no-op |
//! | Allocation Fault | Registry growth fails mid-operation | Typed error, no partial state |
//!
//! Forgery is out of scope: the fingerprint is not a MAC and an attacker
//! who can read it can construct collisions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    MEMORY GUARD REGISTRY                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │   caller memory          RegionRef<'a>           Registry    │
//! │  ┌─────────────┐ borrow ┌─────────────┐  call  ┌──────────┐  │
//! │  │ balance: 42 │───────▶│ id + bytes  │───────▶│ Entry[0] │  │
//! │  └─────────────┘        └─────────────┘        │ Entry[1] │  │
//! │                                                │ ...      │  │
//! │                         ┌─────────────┐        └────┬─────┘  │
//! │                         │ Fingerprint │◀────────────┘        │
//! │                         │   Engine    │  protect/update/     │
//! │                         └─────────────┘  verify              │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mguard_registry::{Protection, RegionRef, Registry, Update, VerifyResult};
//!
//! let mut registry = Registry::new().unwrap();
//!
//! let mut balance: i64 = 1_000;
//! assert_eq!(
//!     registry.protect(RegionRef::of(&balance)).unwrap(),
//!     Protection::Protected { capacity: 1 }
//! );
//!
//! // An unacknowledged write is caught.
//! balance += 500;
//! assert!(matches!(
//!     registry.verify(RegionRef::of(&balance)),
//!     VerifyResult::Tampered { .. }
//! ));
//!
//! // A legitimate write is acknowledged.
//! assert_eq!(
//!     registry.update(RegionRef::of(&balance)).unwrap(),
//!     Update::Updated { size: 8 }
//! );
//! assert!(!registry.is_compromised(RegionRef::of(&balance)));
//!
//! // Anything never protected is untrusted.
//! let stranger: i64 = 0;
//! assert!(registry.is_compromised(RegionRef::of(&stranger)));
//! ```
//!
//! ## Security Considerations
//!
//! - **Address Reuse**: identity is an address. A freed buffer replaced by an
//!   unrelated one at the same address is indistinguishable.
//! - **Moves**: a value that moves (a `Vec` reallocation, a struct returned
//!   by value) has a new identity and must be protected again.
//! - **Time-of-Check to Time-of-Use**: a verification is a point-in-time
//!   answer. Hold whatever lock guards the data across check and use.

pub mod fingerprint;
pub mod models;
pub mod region;
pub mod registry;

pub use fingerprint::{fingerprint, Digest, Fingerprinter};
pub use models::{Entry, GrowthPolicy, Protection, RegistryError, Result, Update, VerifyResult};
pub use region::{Plain, RegionId, RegionRef};
pub use registry::Registry;

#[cfg(test)]
mod tests;
