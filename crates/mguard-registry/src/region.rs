//! # Region Identity and Borrowed Views
//!
//! The registry monitors memory it does not own. This module defines how a
//! caller's buffer is named ([`RegionId`]) and how its bytes are lent to the
//! registry for the duration of a single call ([`RegionRef`]).
//!
//! ## Identity
//!
//! Two views denote the same region when they start at the same address.
//! Length plays no part in identity: a second protect of the same address
//! with a different length is a duplicate, not a new region.
//!
//! If a buffer is freed and an unrelated buffer is later allocated at the
//! same address, the registry cannot tell them apart. Callers that recycle
//! storage must treat that as their responsibility.
//!
//! Zero-length views with no backing allocation have no address of their
//! own. An empty `Vec` or an empty slice carved from one points at the same
//! aligned placeholder (`0x1` for bytes), so every such view is one region:
//! the first protect registers it and later ones report a duplicate. Give a
//! zero-length region real storage when it must be tracked separately.
//!
//! ## Borrowed-Buffer Contract
//!
//! The registry stores only the [`RegionId`] and the size, never the borrow.
//! The caller therefore stays free to mutate the region between calls, and
//! must keep it alive and unmoved for as long as it expects verification to
//! mean anything. A `Vec` that reallocates moves its contents to a new
//! address; re-protect after any such move.
//!
//! ## Plain Types
//!
//! Viewing a typed value as bytes is only sound when every byte of the value
//! is initialized. [`Plain`] marks such types. It is implemented for the
//! primitive scalars, arrays and slices of plain types, and `str`. Structs
//! may opt in when they are `#[repr(C)]` (or `#[repr(transparent)]`) and
//! contain no padding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;
use std::slice;

/// Marker for types whose in-memory representation is fully initialized.
///
/// # Safety
///
/// Implementors must guarantee that every byte of every value of the type is
/// initialized: no padding, no `MaybeUninit` fields, no unions with
/// uninitialized tails. Types with interior mutability are excluded, since a
/// shared borrow must not observe concurrent writes.
///
/// # Example
///
/// ```rust
/// use mguard_registry::{Plain, RegionRef};
///
/// #[repr(C)]
/// struct Account {
///     number: [u8; 16],
///     balance: i32,
/// }
///
/// // 16 + 4 bytes, 4-byte aligned: no padding.
/// unsafe impl Plain for Account {}
///
/// let account = Account { number: *b"000000000000042\0", balance: 100 };
/// assert_eq!(RegionRef::of(&account).len(), 20);
/// ```
pub unsafe trait Plain {}

macro_rules! impl_plain {
    ($($ty:ty),* $(,)?) => {
        $(unsafe impl Plain for $ty {})*
    };
}

impl_plain!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
);

unsafe impl<T: Plain, const N: usize> Plain for [T; N] {}
unsafe impl<T: Plain> Plain for [T] {}
unsafe impl Plain for str {}

/// Opaque identity of a protected region: its start address.
///
/// Unallocated zero-length buffers of the same alignment share one
/// placeholder address, and therefore one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(usize);

impl RegionId {
    /// Identity of the region starting at `value`.
    ///
    /// Only the address is taken; no bytes are read.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self((value as *const T).cast::<u8>() as usize)
    }

    /// Raw address backing this identity.
    pub const fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A borrowed, non-owning view of a caller's memory region.
///
/// Built fresh for every registry call. The lifetime ties the view to the
/// caller's buffer; the registry never retains it.
#[derive(Clone, Copy)]
pub struct RegionRef<'a> {
    id: RegionId,
    bytes: &'a [u8],
}

impl<'a> RegionRef<'a> {
    /// Views the bytes of `value`.
    ///
    /// ```rust
    /// use mguard_registry::RegionRef;
    ///
    /// let balance: i32 = 31337;
    /// let view = RegionRef::of(&balance);
    /// assert_eq!(view.len(), 4);
    /// ```
    pub fn of<T: Plain + ?Sized>(value: &'a T) -> Self {
        let len = mem::size_of_val(value);
        let ptr = (value as *const T).cast::<u8>();
        // SAFETY: `T: Plain` guarantees all `len` bytes are initialized, and
        // the shared borrow keeps them alive and unaliased by writers for 'a.
        let bytes = unsafe { slice::from_raw_parts(ptr, len) };
        Self {
            id: RegionId::of(value),
            bytes,
        }
    }

    /// Views a byte slice directly.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            id: RegionId::of(bytes),
            bytes,
        }
    }

    /// Narrows the view to its first `len` bytes, keeping the identity.
    ///
    /// Lengths past the end are clamped.
    pub fn prefix(self, len: usize) -> Self {
        let len = len.min(self.bytes.len());
        Self {
            bytes: &self.bytes[..len],
            ..self
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for RegionRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Regions may hold secrets; print shape only.
        f.debug_struct("RegionRef")
            .field("id", &self.id)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl<'a> From<&'a [u8]> for RegionRef<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::from_bytes(bytes)
    }
}
