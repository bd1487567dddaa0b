//! # State Adapter
//!
//! In-memory contract storage.
//! Production implementation would persist through Subsystem 4 (State Management).

use crate::domain::value_objects::{StorageKey, StorageValue};
use crate::errors::StateError;
use crate::ports::outbound::ContractStorage;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory slot store.
///
/// Clones share the same slots, so a test can keep a handle and observe what
/// a contract committed.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    slots: Arc<RwLock<BTreeMap<StorageKey, StorageValue>>>,
}

impl InMemoryStorage {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a slot (zero if unset).
    #[must_use]
    pub fn get(&self, key: &StorageKey) -> StorageValue {
        self.slots.read().get(key).copied().unwrap_or_default()
    }

    /// Set a slot directly, bypassing any contract.
    pub fn set(&self, key: StorageKey, value: StorageValue) {
        if value.is_zero() {
            self.slots.write().remove(&key);
        } else {
            self.slots.write().insert(key, value);
        }
    }

    /// Number of non-zero slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// True if every slot is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Copy of all non-zero slots.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<StorageKey, StorageValue> {
        self.slots.read().clone()
    }
}

impl ContractStorage for InMemoryStorage {
    fn load(&self, key: &StorageKey) -> Result<StorageValue, StateError> {
        Ok(self.get(key))
    }

    fn store(&self, key: StorageKey, value: StorageValue) -> Result<(), StateError> {
        self.set(key, value);
        Ok(())
    }

    fn apply(&self, writes: BTreeMap<StorageKey, StorageValue>) -> Result<(), StateError> {
        let mut slots = self.slots.write();
        for (key, value) in writes {
            if value.is_zero() {
                slots.remove(&key);
            } else {
                slots.insert(key, value);
            }
        }
        Ok(())
    }
}

/// Storage whose `n`-th write (1-based) fails with [`StateError::Unavailable`].
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct FlakyStorage {
    pub(crate) inner: InMemoryStorage,
    fail_at: usize,
    writes: Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl FlakyStorage {
    pub(crate) fn failing_write(fail_at: usize) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            fail_at,
            writes: Arc::default(),
        }
    }
}

#[cfg(test)]
impl ContractStorage for FlakyStorage {
    fn load(&self, key: &StorageKey) -> Result<StorageValue, StateError> {
        self.inner.load(key)
    }

    fn store(&self, key: StorageKey, value: StorageValue) -> Result<(), StateError> {
        let n = self
            .writes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        if n == self.fail_at {
            return Err(StateError::Unavailable);
        }
        self.inner.store(key, value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
