//! # Domain Services
//!
//! Pure helper functions for system contract execution.
//! These functions are deterministic and have no side effects.

use crate::domain::value_objects::{Hash, Selector};
use sha3::{Digest, Keccak256};

// =============================================================================
// HASHING
// =============================================================================

/// Computes the Keccak-256 hash of data.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let hash = Keccak256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Hash::new(bytes)
}

/// Computes the selector of a canonical signature, e.g. `init()`.
///
/// Selector = keccak256(signature)\[0..4\].
#[must_use]
pub fn selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&hash.0[..4]);
    Selector::new(bytes)
}

// =============================================================================
// CANONICAL SIGNATURES
// =============================================================================

/// Signatures of the operations, errors and events the injector base exposes.
pub mod signatures {
    /// Registers the delayed initializer payload (height 0 only).
    pub const USE_DELAYED_INITIALIZER: &str = "useDelayedInitializer(bytes)";
    /// Runs the one-time initialization (height 1 only).
    pub const INIT: &str = "init()";
    /// Reports the initialization guard state.
    pub const IS_INITIALIZED: &str = "isInitialized()";
    /// Batched invocation.
    pub const MULTICALL: &str = "multicall(bytes[])";

    /// Producer mismatch, carries the expected producer.
    pub const ERR_ONLY_COINBASE: &str = "OnlyCoinbase(address)";
    /// Caller is not the slashing indicator.
    pub const ERR_ONLY_SLASHING_INDICATOR: &str = "OnlySlashingIndicator()";
    /// Caller is not governance.
    pub const ERR_ONLY_GOVERNANCE: &str = "OnlyGovernance()";
    /// Height mismatch, carries the required height.
    pub const ERR_ONLY_BLOCK: &str = "OnlyBlock(uint64)";
    /// Plain reason string.
    pub const ERR_REASON: &str = "Error(string)";

    /// Emitted once the initialization guard fires.
    pub const EVENT_INITIALIZED: &str = "Initialized(uint8)";
}

// =============================================================================
// TESTS
// =============================================================================
