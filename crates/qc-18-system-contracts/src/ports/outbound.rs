//! # Driven Ports (SPI - Outbound)
//!
//! These are the interfaces the System Contracts subsystem depends on.
//!
//! ## Architecture Compliance (Architecture.md v2.3)
//!
//! - Dependencies point INWARD (adapters implement these traits)
//! - Execution is synchronous: a call never suspends, so the storage port is
//!   a plain (non-async) trait

use crate::domain::value_objects::{StorageKey, StorageValue};
use crate::errors::StateError;
use std::collections::BTreeMap;

// =============================================================================
// CONTRACT STORAGE (persisted state of one system contract)
// =============================================================================

/// Word-addressed persisted state owned by a single system contract.
///
/// Writes that reach this port are committed: the injector buffers writes in
/// its own journal and only flushes the outermost frame on success.
pub trait ContractStorage: Send + Sync {
    /// Reads a slot. Never-written slots read as zero.
    fn load(&self, key: &StorageKey) -> Result<StorageValue, StateError>;

    /// Writes a slot. Writing zero clears it.
    fn store(&self, key: StorageKey, value: StorageValue) -> Result<(), StateError>;

    /// Applies a committed write set: either every write lands or none does.
    ///
    /// The default writes slot by slot and, if a write fails, puts back the
    /// previous values of the slots already written. Backends with native
    /// batches should override it.
    fn apply(&self, writes: BTreeMap<StorageKey, StorageValue>) -> Result<(), StateError> {
        let previous = writes
            .keys()
            .map(|key| Ok((*key, self.load(key)?)))
            .collect::<Result<Vec<_>, StateError>>()?;

        for (written, (key, value)) in writes.into_iter().enumerate() {
            if let Err(err) = self.store(key, value) {
                for (key, value) in previous.into_iter().take(written) {
                    // The original failure is the one reported.
                    let _ = self.store(key, value);
                }
                return Err(err);
            }
        }
        Ok(())
    }
}
