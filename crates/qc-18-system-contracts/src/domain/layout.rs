//! # Reserved Layout
//!
//! Persisted-state header shared by every system contract built on the
//! injector. Derived units declare their own fields strictly after the header,
//! so fields the base adds in later revisions never collide with theirs.
//!
//! ```text
//! slot  0        guard word (initialized version, initializing flag)
//! slot  1        delayed initializer payload
//! slots 2..12    consumed by earlier revisions, never reused
//! slots 12..100  reserved for future base fields
//! slots 100..    derived unit fields
//! ```
//!
//! Slot 0 is the documented position observers read to learn whether the
//! guard has fired; the guard has no other accessor.

use crate::domain::services::keccak256;
use crate::domain::value_objects::{StorageKey, StorageValue, U256};

/// Total header size in slots. Constant across revisions.
pub const LAYOUT_OFFSET: u64 = 100;

/// Slots used by prior revisions.
pub const CONSUMED_SLOTS: u64 = 10;

/// Slots used by the lifecycle bookkeeping (guard word, delayed payload).
pub const LIFECYCLE_SLOTS: u64 = 2;

/// Padding that keeps the header at [`LAYOUT_OFFSET`] slots.
pub const RESERVED_SLOTS: u64 = LAYOUT_OFFSET - CONSUMED_SLOTS - LIFECYCLE_SLOTS;

/// Guard word position.
pub const GUARD_SLOT: StorageKey = StorageKey::from_index(0);

/// Delayed initializer payload position.
pub const DELAYED_INITIALIZER_SLOT: StorageKey = StorageKey::from_index(1);

/// First consumed slot.
pub const CONSUMED_START: u64 = LIFECYCLE_SLOTS;

/// First reserved slot.
pub const RESERVED_START: u64 = CONSUMED_START + CONSUMED_SLOTS;

const _: () = assert!(LIFECYCLE_SLOTS + CONSUMED_SLOTS + RESERVED_SLOTS == LAYOUT_OFFSET);

/// The header split for the current revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservedLayout {
    /// Header positions used by prior revisions.
    pub consumed_slots: u64,
    /// Header positions kept free for future revisions.
    pub reserved_slots: u64,
}

impl ReservedLayout {
    /// Layout of this revision.
    pub const CURRENT: Self = Self {
        consumed_slots: CONSUMED_SLOTS,
        reserved_slots: RESERVED_SLOTS,
    };

    /// Total header size, including the lifecycle slots.
    #[must_use]
    pub const fn header_slots(&self) -> u64 {
        LIFECYCLE_SLOTS + self.consumed_slots + self.reserved_slots
    }

    /// Slot of the derived unit's field number `index`.
    #[must_use]
    pub const fn field_slot(&self, index: u64) -> StorageKey {
        StorageKey::from_index(self.header_slots() + index)
    }

    /// True if `slot` falls inside the header.
    #[must_use]
    pub fn is_header_slot(&self, slot: &StorageKey) -> bool {
        slot.to_u256() < U256::from(self.header_slots())
    }
}

// =============================================================================
// GUARD WORD
// =============================================================================

/// The packed one-time guard state held at [`GUARD_SLOT`].
///
/// Byte 31 (lowest order) is the initialized version, byte 30 the
/// initializing flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuardWord {
    /// Highest version initialized so far (0 = never).
    pub initialized: u8,
    /// True while the initializer body runs.
    pub initializing: bool,
}

impl GuardWord {
    /// Decodes the guard word.
    #[must_use]
    pub fn decode(value: &StorageValue) -> Self {
        Self {
            initialized: value.0[31],
            initializing: value.0[30] != 0,
        }
    }

    /// Encodes the guard word.
    #[must_use]
    pub fn encode(self) -> StorageValue {
        let mut bytes = [0u8; 32];
        bytes[31] = self.initialized;
        bytes[30] = u8::from(self.initializing);
        StorageValue::new(bytes)
    }

    /// True once the guard has fired.
    #[must_use]
    pub fn is_initialized(self) -> bool {
        self.initialized > 0
    }
}

// =============================================================================
// DYNAMIC BYTES
// =============================================================================

/// Header word of a dynamic byte string stored at a slot.
///
/// Short values (< 32 bytes) live in the slot itself with `len * 2` in the
/// lowest byte; longer values store `len * 2 + 1` and keep their content in
/// consecutive slots starting at `keccak256(slot)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BytesHeader {
    /// Content held inline.
    Short(Vec<u8>),
    /// Content held in `chunks(len)` data slots.
    Long {
        /// Content length in bytes.
        len: usize,
    },
}

impl BytesHeader {
    /// Builds the header for `data`.
    #[must_use]
    pub fn for_data(data: &[u8]) -> Self {
        if data.len() < 32 {
            Self::Short(data.to_vec())
        } else {
            Self::Long { len: data.len() }
        }
    }

    /// Decodes a header word. Returns None for an inconsistent word.
    #[must_use]
    pub fn decode(value: &StorageValue) -> Option<Self> {
        let raw = value.to_u256();
        if raw.bit(0) {
            let len = ((raw - U256::one()) / U256::from(2u8)).low_u64();
            if raw.bits() > 64 || len < 32 {
                return None;
            }
            Some(Self::Long {
                len: usize::try_from(len).ok()?,
            })
        } else {
            let len = usize::from(value.0[31] / 2);
            if len >= 32 || value.0[len..31].iter().any(|b| *b != 0) {
                return None;
            }
            Some(Self::Short(value.0[..len].to_vec()))
        }
    }

    /// Encodes the header word.
    #[must_use]
    pub fn encode(&self) -> StorageValue {
        match self {
            Self::Short(data) => {
                let mut bytes = [0u8; 32];
                bytes[..data.len()].copy_from_slice(data);
                // Short data is < 32 bytes.
                #[allow(clippy::cast_possible_truncation)]
                let len = data.len() as u8;
                bytes[31] = len * 2;
                StorageValue::new(bytes)
            }
            Self::Long { len } => {
                StorageValue::from_u256(U256::from(*len) * U256::from(2u8) + U256::one())
            }
        }
    }

    /// Number of data slots used outside the header word.
    #[must_use]
    pub fn data_slots(&self) -> u64 {
        match self {
            Self::Short(_) => 0,
            Self::Long { len } => chunks(*len),
        }
    }
}

/// First data slot of a long byte string stored at `slot`.
#[must_use]
pub fn data_start(slot: &StorageKey) -> StorageKey {
    StorageKey::new(keccak256(slot.as_bytes()).0)
}

/// Number of 32-byte words needed for `len` bytes.
#[must_use]
pub fn chunks(len: usize) -> u64 {
    (len as u64).div_ceil(32)
}

// =============================================================================
// TESTS
// =============================================================================
