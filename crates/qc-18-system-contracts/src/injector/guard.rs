//! # Initialization Guard
//!
//! One-time guard state and the delayed initializer payload, both kept in
//! the lifecycle slots of the header.
//!
//! The guard has no accessor of its own. Observers learn whether it has fired
//! by reading the guard word at [`GUARD_SLOT`].

use crate::domain::layout::{GuardWord, DELAYED_INITIALIZER_SLOT, GUARD_SLOT};
use crate::errors::StateError;
use crate::injector::InjectorContext;
use crate::ports::outbound::ContractStorage;

impl InjectorContext {
    /// Current guard state.
    pub fn guard_word(&self) -> Result<GuardWord, StateError> {
        Ok(GuardWord::decode(&self.journal().load(&GUARD_SLOT)?))
    }

    pub(crate) fn set_guard_word(&mut self, word: GuardWord) -> Result<(), StateError> {
        self.journal_mut().store(GUARD_SLOT, word.encode())
    }

    /// The registered delayed payload (empty if none).
    pub fn delayed_payload(&self) -> Result<Vec<u8>, StateError> {
        self.journal().load_bytes(&DELAYED_INITIALIZER_SLOT)
    }

    pub(crate) fn set_delayed_payload(&mut self, payload: &[u8]) -> Result<(), StateError> {
        self.journal_mut()
            .store_bytes(DELAYED_INITIALIZER_SLOT, payload)
    }

    /// Removes the payload and returns it.
    pub(crate) fn take_delayed_payload(&mut self) -> Result<Vec<u8>, StateError> {
        let payload = self.delayed_payload()?;
        if !payload.is_empty() {
            self.set_delayed_payload(&[])?;
        }
        Ok(payload)
    }
}

/// Reads the guard state of a system contract straight from its storage.
pub fn read_initialized(storage: &dyn ContractStorage) -> Result<bool, StateError> {
    Ok(GuardWord::decode(&storage.load(&GUARD_SLOT)?).is_initialized())
}

// =============================================================================
// TESTS
// =============================================================================
