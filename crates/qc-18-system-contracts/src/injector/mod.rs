//! # Injector Base
//!
//! The state every system contract is built on: its own address, the peer
//! registry, the reserved header layout and a journaled view of persisted
//! state.
//!
//! - [`access`]: authorization predicates
//! - [`guard`]: one-time initialization guard and delayed payload
//! - [`dispatch`]: calldata routing, delegated invocation and batching
//! - [`journal`]: atomic storage overlay

pub mod access;
pub mod dispatch;
pub mod guard;
pub mod journal;

pub use access::*;
pub use guard::read_initialized;
pub use journal::Journal;

use crate::config::InjectorConfig;
use crate::domain::entities::Log;
use crate::domain::layout::ReservedLayout;
use crate::domain::peers::PeerSet;
use crate::domain::services::keccak256;
use crate::domain::value_objects::{Address, Bytes, Hash, StorageKey, StorageValue};
use crate::errors::{ConfigError, InjectorError, StateError};
use crate::ports::inbound::SystemContract;
use crate::ports::outbound::ContractStorage;

/// Base state of one system contract.
#[derive(Debug)]
pub struct InjectorContext {
    address: Address,
    peers: PeerSet,
    layout: ReservedLayout,
    journal: Journal,
}

impl InjectorContext {
    /// Binds a contract at `address` to its peers and storage.
    ///
    /// The peer set is fixed here for the lifetime of the contract.
    pub fn new(address: Address, peers: PeerSet, storage: impl ContractStorage + 'static) -> Self {
        Self {
            address,
            peers,
            layout: ReservedLayout::CURRENT,
            journal: Journal::new(storage),
        }
    }

    /// Builds the context from a genesis configuration.
    pub fn from_config(
        config: &InjectorConfig,
        storage: impl ContractStorage + 'static,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.contract_address()?,
            config.peer_set()?,
            storage,
        ))
    }

    /// Address of this contract.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The peer registry.
    #[must_use]
    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }

    /// The header layout.
    #[must_use]
    pub fn layout(&self) -> &ReservedLayout {
        &self.layout
    }

    // =========================================================================
    // DERIVED FIELDS
    // =========================================================================

    /// Slot of the derived unit's field `index`.
    #[must_use]
    pub fn field_slot(&self, index: u64) -> StorageKey {
        self.layout.field_slot(index)
    }

    /// Slot of `key` in the mapping declared as field `index`.
    #[must_use]
    pub fn mapping_slot(&self, index: u64, key: &[u8]) -> StorageKey {
        let mut preimage = key.to_vec();
        preimage.extend_from_slice(self.field_slot(index).as_bytes());
        StorageKey::new(*keccak256(&preimage).as_bytes())
    }

    /// Reads derived field `index`.
    pub fn load_field(&self, index: u64) -> Result<StorageValue, InjectorError> {
        self.load(&self.field_slot(index))
    }

    /// Writes derived field `index`.
    pub fn store_field(&mut self, index: u64, value: StorageValue) -> Result<(), InjectorError> {
        self.store(self.field_slot(index), value)
    }

    /// Reads any slot, header included.
    pub fn load(&self, slot: &StorageKey) -> Result<StorageValue, InjectorError> {
        Ok(self.journal.load(slot)?)
    }

    /// Writes a derived slot. The header is only written by the base itself.
    pub fn store(&mut self, slot: StorageKey, value: StorageValue) -> Result<(), InjectorError> {
        if self.layout.is_header_slot(&slot) {
            return Err(StateError::HeaderWrite.into());
        }
        Ok(self.journal.store(slot, value)?)
    }

    // =========================================================================
    // LOGS
    // =========================================================================

    /// Emits a log from this contract. Dropped if the invocation fails.
    pub fn emit(&mut self, topics: Vec<Hash>, data: Bytes) {
        let log = Log::new(self.address, topics, data);
        self.journal.emit(log);
    }

    /// Drains logs of committed invocations.
    pub fn take_logs(&mut self) -> Vec<Log> {
        self.journal.take_logs()
    }

    pub(crate) fn journal(&self) -> &Journal {
        &self.journal
    }

    pub(crate) fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }
}

/// A bare injector has no operations beyond the base surface.
impl SystemContract for InjectorContext {
    fn injector(&self) -> &InjectorContext {
        self
    }

    fn injector_mut(&mut self) -> &mut InjectorContext {
        self
    }
}

/// Runs `f` inside a journal frame: committed on success, dropped on failure.
pub(crate) fn atomic<C, T, F>(contract: &mut C, f: F) -> Result<T, InjectorError>
where
    C: SystemContract + ?Sized,
    F: FnOnce(&mut C) -> Result<T, InjectorError>,
{
    contract.injector_mut().journal_mut().checkpoint();
    match f(contract) {
        Ok(value) => {
            contract.injector_mut().journal_mut().commit()?;
            Ok(value)
        }
        Err(err) => {
            contract.injector_mut().journal_mut().revert();
            Err(err)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
