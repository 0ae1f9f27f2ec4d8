//! # Integration Tests for the Registry
//!
//! These tests exercise the registry and fingerprint engine together.
//!
//! ## Test Categories
//!
//! 1. **Fingerprint**: determinism and sensitivity
//! 2. **Init**: fresh registry state
//! 3. **Protect**: registration, duplicates, capacity sequence
//! 4. **Find**: position lookup
//! 5. **Update**: acknowledging changes
//! 6. **Compromised**: fail-closed verification
//! 7. **Stress**: many regions across two registries
//! 8. **Properties**: randomized checks with proptest

use crate::fingerprint::fingerprint;
use crate::models::{Protection, Update, VerifyResult};
use crate::region::{Plain, RegionId, RegionRef};
use crate::registry::Registry;
use proptest::prelude::*;

// =============================================================================
// Helper Types
// =============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct BankAccount {
    account_number: [u8; 16],
    balance: i32,
}

unsafe impl Plain for BankAccount {}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct BankTransfer {
    from_account_number: [u8; 16],
    to_account_number: [u8; 16],
    amount: i32,
}

unsafe impl Plain for BankTransfer {}

fn account_number(n: usize) -> [u8; 16] {
    let mut out = [0u8; 16];
    let text = format!("{:015}", n);
    out[..15].copy_from_slice(text.as_bytes());
    out
}

fn parse_account_number(raw: &[u8; 16]) -> usize {
    raw[..15]
        .iter()
        .fold(0, |acc, digit| acc * 10 + usize::from(digit - b'0'))
}

/// Deterministic xorshift generator so the stress test is reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

fn protected(registry: &mut Registry, region: RegionRef<'_>) -> usize {
    registry.protect(region).unwrap().code()
}

// =============================================================================
// Fingerprint Tests
// =============================================================================

#[test]
fn test_fingerprint_returns_a_digest() {
    let data: i32 = 31337;
    assert_ne!(fingerprint(RegionRef::of(&data).bytes()), 0);
}

#[test]
fn test_fingerprint_same_data_same_digest() {
    let data0: i32 = 31337;
    let data1: i32 = 31337;

    assert_eq!(
        fingerprint(RegionRef::of(&data0).bytes()),
        fingerprint(RegionRef::of(&data1).bytes())
    );
}

#[test]
fn test_fingerprint_changes_with_data() {
    let mut data: i32 = 31337;
    let before = fingerprint(RegionRef::of(&data).bytes());

    data = 43922;
    let after = fingerprint(RegionRef::of(&data).bytes());

    assert_ne!(before, after);
}

#[test]
fn test_fingerprint_changes_with_any_data() {
    let number: i32 = 31337;
    let text = "Snafu and fubar are present.";

    assert_ne!(
        fingerprint(RegionRef::of(&number).bytes()),
        fingerprint(RegionRef::of(text).bytes())
    );
}

// =============================================================================
// Init Tests
// =============================================================================

#[test]
fn test_init_sets_up_registry() {
    let registry = Registry::new().unwrap();

    assert_eq!(registry.capacity(), 1);
    assert_eq!(registry.used(), 0);
}

#[test]
fn test_init_registries_are_independent() {
    let mut first = Registry::new().unwrap();
    let second = Registry::new().unwrap();
    let data: i32 = 31337;

    first.protect(RegionRef::of(&data)).unwrap();

    assert_eq!(first.used(), 1);
    assert_eq!(second.used(), 0);
    assert!(second.is_compromised(RegionRef::of(&data)));
}

// =============================================================================
// Protect Tests
// =============================================================================

#[test]
fn test_protect_adds_region() {
    let mut registry = Registry::new().unwrap();
    let data: i32 = 31337;

    assert_eq!(
        registry.protect(RegionRef::of(&data)).unwrap(),
        Protection::Protected { capacity: 1 }
    );
    assert_eq!(registry.used(), 1);
}

#[test]
fn test_protect_rejects_existing_region() {
    let mut registry = Registry::new().unwrap();
    let data: i32 = 31337;

    assert_eq!(protected(&mut registry, RegionRef::of(&data)), 1);
    assert_eq!(
        registry.protect(RegionRef::of(&data)).unwrap(),
        Protection::AlreadyProtected
    );
    assert_eq!(registry.used(), 1);
    assert_eq!(registry.capacity(), 1);
}

#[test]
fn test_protect_capacity_sequence() {
    let mut registry = Registry::new().unwrap();
    let data0: i32 = 31337;
    let data1: i32 = 34922;
    let data2: i32 = 11350;
    let data3: i32 = 11550;

    assert_eq!(protected(&mut registry, RegionRef::of(&data0)), 1);
    assert_eq!(protected(&mut registry, RegionRef::of(&data1)), 2);
    assert_eq!(protected(&mut registry, RegionRef::of(&data2)), 3);
    assert_eq!(protected(&mut registry, RegionRef::of(&data3)), 4);
    assert_eq!(registry.used(), 4);
}

#[test]
fn test_protect_preserves_insertion_order() {
    let mut registry = Registry::new().unwrap();
    let values = [5u8, 4, 3, 2, 1];

    for value in &values {
        registry.protect(RegionRef::of(value)).unwrap();
    }

    let ids: Vec<RegionId> = registry.entries().iter().map(|e| e.id).collect();
    let expected: Vec<RegionId> = values.iter().map(RegionId::of).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_protect_unallocated_empty_buffers_share_identity() {
    let mut registry = Registry::new().unwrap();
    let first: Vec<u8> = Vec::new();
    let second: Vec<u8> = Vec::new();

    assert_eq!(
        RegionRef::from_bytes(&first).id(),
        RegionRef::from_bytes(&second).id()
    );
    assert_eq!(
        registry.protect(RegionRef::from_bytes(&first)).unwrap(),
        Protection::Protected { capacity: 1 }
    );
    assert_eq!(
        registry.protect(RegionRef::from_bytes(&second)).unwrap(),
        Protection::AlreadyProtected
    );
    assert_eq!(registry.used(), 1);
    assert!(!registry.is_compromised(RegionRef::from_bytes(&second)));
}

// =============================================================================
// Find Tests
// =============================================================================

#[test]
fn test_find_returns_position_if_protected() {
    let mut registry = Registry::new().unwrap();
    let data: i32 = 0;

    registry.protect(RegionRef::of(&data)).unwrap();
    assert_eq!(registry.find(RegionId::of(&data)), Some(0));
}

#[test]
fn test_find_returns_none_if_not_protected() {
    let mut registry = Registry::new().unwrap();
    let data0: i32 = 31337;
    let data1: i32 = 34922;

    registry.protect(RegionRef::of(&data0)).unwrap();
    assert_eq!(registry.find(RegionId::of(&data1)), None);
    assert_eq!(registry.find_code(RegionId::of(&data1)), -1);
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_update_creates_new_digest() {
    let mut registry = Registry::new().unwrap();
    let mut data: i32 = 31337;

    registry.protect(RegionRef::of(&data)).unwrap();
    let old_digest = registry.entry(0).unwrap().digest;

    data = 34922;
    let new_digest = fingerprint(RegionRef::of(&data).bytes());

    assert_eq!(
        registry.update(RegionRef::of(&data)).unwrap(),
        Update::Updated { size: 4 }
    );
    assert_eq!(registry.entry(0).unwrap().digest, new_digest);
    assert_ne!(registry.entry(0).unwrap().digest, old_digest);
}

#[test]
fn test_update_returns_not_protected() {
    let mut registry = Registry::new().unwrap();
    let data0: i32 = 31337;
    let data1: i32 = 34922;

    registry.protect(RegionRef::of(&data0)).unwrap();

    assert_eq!(
        registry.update(RegionRef::of(&data1)).unwrap(),
        Update::NotProtected
    );
    assert_eq!(registry.used(), 1);
    assert!(!registry.contains(RegionId::of(&data1)));
}

// =============================================================================
// Compromised Tests
// =============================================================================

#[test]
fn test_not_compromised_when_untouched() {
    let mut registry = Registry::new().unwrap();
    let data: i32 = 31337;

    registry.protect(RegionRef::of(&data)).unwrap();
    assert!(!registry.is_compromised(RegionRef::of(&data)));
    assert_eq!(registry.verify(RegionRef::of(&data)), VerifyResult::Intact);
}

#[test]
fn test_compromised_when_changed() {
    let mut registry = Registry::new().unwrap();
    let mut data: i32 = 31337;

    registry.protect(RegionRef::of(&data)).unwrap();
    let expected = registry.entry(0).unwrap().digest;

    data = 34922;

    assert!(registry.is_compromised(RegionRef::of(&data)));
    assert_eq!(
        registry.verify(RegionRef::of(&data)),
        VerifyResult::Tampered {
            expected,
            actual: fingerprint(&34922i32.to_ne_bytes()),
        }
    );
    // Verification never acknowledges the change.
    assert_eq!(registry.entry(0).unwrap().digest, expected);
}

#[test]
fn test_compromised_when_not_protected() {
    let mut registry = Registry::new().unwrap();
    let data0: i32 = 31337;
    let data1: i32 = 34922;

    registry.protect(RegionRef::of(&data0)).unwrap();

    assert!(registry.is_compromised(RegionRef::of(&data1)));
    assert_eq!(registry.verify(RegionRef::of(&data1)), VerifyResult::Unknown);
}

#[test]
fn test_balance_scenario() {
    let mut registry = Registry::new().unwrap();
    let mut balance: i32 = 31337;

    assert_eq!(protected(&mut registry, RegionRef::of(&balance)), 1);

    balance = 34922;
    assert!(registry.is_compromised(RegionRef::of(&balance)));

    assert_eq!(registry.update(RegionRef::of(&balance)).unwrap().code(), 4);
    assert!(!registry.is_compromised(RegionRef::of(&balance)));
}

// =============================================================================
// Stress Tests
// =============================================================================

#[test]
fn test_stress_accounts_and_transfers() {
    const ACCOUNTS: usize = 128;
    const TRANSFERS: usize = 1024;

    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);

    let mut accounts: Vec<BankAccount> = (0..ACCOUNTS)
        .map(|i| BankAccount {
            account_number: account_number(i),
            balance: rng.below(100_000) as i32,
        })
        .collect();

    let transfers: Vec<BankTransfer> = (0..TRANSFERS)
        .map(|_| {
            let from = rng.below(ACCOUNTS);
            let mut to = rng.below(ACCOUNTS);
            if from == to {
                to = (to + 1) % ACCOUNTS;
            }
            BankTransfer {
                from_account_number: account_number(from),
                to_account_number: account_number(to),
                amount: rng.below(100_000) as i32,
            }
        })
        .collect();

    let mut guarded_accounts = Registry::new().unwrap();
    let mut guarded_transfers = Registry::new().unwrap();

    for account in &accounts {
        guarded_accounts.protect(RegionRef::of(account)).unwrap();
    }
    for transfer in &transfers {
        guarded_transfers.protect(RegionRef::of(transfer)).unwrap();
    }

    assert_eq!(guarded_accounts.used(), ACCOUNTS);
    assert_eq!(guarded_accounts.capacity(), ACCOUNTS);
    assert_eq!(guarded_transfers.used(), TRANSFERS);

    let tampered = [2usize, 4, 8, 16, 32, 64];
    let mut applied = 0;

    for (i, transfer) in transfers.iter().enumerate() {
        let from = parse_account_number(&transfer.from_account_number);
        let to = parse_account_number(&transfer.to_account_number);

        if tampered.contains(&i) {
            accounts[i].balance += 100;
            assert!(guarded_accounts.is_compromised(RegionRef::of(&accounts[i])));
            assert!(guarded_accounts.update(RegionRef::of(&accounts[i])).unwrap().is_updated());
        }

        if !guarded_accounts.is_compromised(RegionRef::of(&accounts[from]))
            && !guarded_accounts.is_compromised(RegionRef::of(&accounts[to]))
            && !guarded_transfers.is_compromised(RegionRef::of(transfer))
        {
            accounts[from].balance = accounts[from].balance.wrapping_sub(transfer.amount);
            accounts[to].balance = accounts[to].balance.wrapping_add(transfer.amount);

            assert!(guarded_accounts.update(RegionRef::of(&accounts[from])).unwrap().is_updated());
            assert!(guarded_accounts.update(RegionRef::of(&accounts[to])).unwrap().is_updated());
            applied += 1;
        }
    }

    // Every change went through update, so nothing was ever rejected.
    assert_eq!(applied, TRANSFERS);
    assert!(accounts
        .iter()
        .all(|account| !guarded_accounts.is_compromised(RegionRef::of(account))));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_fingerprint_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(fingerprint(&bytes), fingerprint(&bytes.clone()));
    }

    #[test]
    fn prop_single_byte_edit_detected(
        bytes in proptest::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        delta in 1u8..=255,
    ) {
        let mut edited = bytes.clone();
        let i = index.index(edited.len());
        edited[i] = edited[i].wrapping_add(delta);
        prop_assert_ne!(fingerprint(&bytes), fingerprint(&edited));
    }

    #[test]
    fn prop_protect_then_verify_intact(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let mut registry = Registry::new().unwrap();
        let region = RegionRef::from_bytes(&bytes);

        prop_assert!(registry.protect(region).unwrap().is_protected());
        prop_assert!(!registry.is_compromised(region));
        prop_assert_eq!(registry.protect(region).unwrap(), Protection::AlreadyProtected);
        prop_assert_eq!(registry.used(), 1);
    }
}
