//! # QC-18 System Contracts - Injector Base
//!
//! **Subsystem ID:** 18
//! **Architecture:** Architecture.md v2.3, IPC-MATRIX.md v2.3
//!
//! ## Purpose
//!
//! The base every built-in system contract (staking, slashing indicator,
//! system reward, governance, ...) is built on. It provides:
//!
//! - a fixed registry of the eight peer system contracts, bound at construction
//! - role-bound authorization predicates keyed to consensus identities
//! - a reserved persisted-state header so derived fields stay put across upgrades
//! - height-gated one-time initialization with a delayed payload
//! - atomic batched invocation that re-raises the failing item's payload
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Header size is constant (100 slots) | `domain/layout.rs` - compile-time `const` assertion |
//! | INVARIANT-2 | Peer references are non-null | `domain/peers.rs` - `PeerSet::from_array()` |
//! | INVARIANT-3 | Batch results correspond 1:1 with requests | `injector/dispatch.rs` - `batch()` |
//! | INVARIANT-4 | Derived fields live after the header | `injector/mod.rs` - `InjectorContext::store()` |
//! | INVARIANT-5 | Call depth limit | `domain/entities.rs` - `child_delegatecall()` |
//!
//! ## Security (IPC-MATRIX.md)
//!
//! - **Envelope-Only Identity**: Identity derived solely from `sender_id`
//! - **Atomic Invocation**: A failed invocation leaves no storage write or log
//!
//! ### IPC Authorization Matrix
//!
//! | Message | Authorized Sender(s) | Enforcement |
//! |---------|---------------------|-------------|
//! | `InvokeSystemContractRequest` | Consensus (8), Block Production (17) | `service.rs` - `handle_invoke()` |
//!
//! ### Lifecycle
//!
//! | Operation | Calldata | Allowed |
//! |-----------|----------|---------|
//! | register delayed payload | `useDelayedInitializer(bytes)` | height 0, repeatable |
//! | init | `init()` | height 1, once |
//! | is initialized | `isInitialized()` | always |
//! | batch | `multicall(bytes[])` | always; items carry their own gates |
//!
//! ## Outbound Dependencies
//!
//! | Subsystem | Trait | Purpose |
//! |-----------|-------|---------|
//! | 4 (State Mgmt) | `ContractStorage` | Read/write contract slots |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_18_system_contracts::prelude::*;
//!
//! struct Governance {
//!     injector: InjectorContext,
//! }
//!
//! impl SystemContract for Governance {
//!     fn injector(&self) -> &InjectorContext { &self.injector }
//!     fn injector_mut(&mut self) -> &mut InjectorContext { &mut self.injector }
//!
//!     fn handle_call(&mut self, ctx: &ExecutionContext, sel: Selector, args: &[u8])
//!         -> Result<Option<Bytes>, InjectorError>
//!     {
//!         if sel == selector("setVotingPeriod(uint256)") {
//!             only_governance(self.injector.peers(), ctx)?;
//!             let period = Decoder::new(args).uint(0)?;
//!             self.injector.store_field(0, StorageValue::from_u256(period))?;
//!             return Ok(Some(Bytes::new()));
//!         }
//!         Ok(None)
//!     }
//! }
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod injector;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        BlockContext, DelegateOutcome, ExecutionContext, InvocationResult, Log,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        Address, Bytes, Hash, Selector, StorageKey, StorageValue, U256,
    };

    // Peers and layout
    pub use crate::domain::layout::{GuardWord, ReservedLayout, GUARD_SLOT, LAYOUT_OFFSET};
    pub use crate::domain::peers::{PeerKind, PeerSet, PEER_COUNT};

    // Encoding and domain services
    pub use crate::domain::abi::{encode, encode_call, Decoder, Token};
    pub use crate::domain::services::{keccak256, selector, signatures};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, limits, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{InjectorApi, SystemContract, SystemContractApi};
    pub use crate::ports::outbound::ContractStorage;

    // Injector
    pub use crate::injector::{
        only_block, only_coinbase, only_coinbase_or_system_reward, only_governance,
        only_initializing, only_slashing_indicator, read_initialized, Access, InjectorContext,
    };

    // Events
    pub use crate::events::{subsystem_ids, InvokeRequestPayload, InvokeResponsePayload};

    // Errors
    pub use crate::errors::{AbiError, ConfigError, InjectorError, IpcError, StateError};

    // Config
    pub use crate::config::{InjectorConfig, ServiceConfig};

    // Adapters
    pub use crate::adapters::InMemoryStorage;

    // Service
    pub use crate::service::{create_test_service, ServiceStats, SystemContractService};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID for IPC (per IPC-MATRIX.md).
pub const SUBSYSTEM_ID: u8 = 18;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "System Contracts";

// =============================================================================
// TESTS
// =============================================================================
