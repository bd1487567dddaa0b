//! # Core Domain Entities
//!
//! Main business entities for system contract execution: the block a call runs
//! in, the context a call carries through nested invocations, and emitted logs.

use crate::domain::invariants::limits;
use crate::domain::value_objects::{Address, Bytes, Hash};
use serde::{Deserialize, Serialize};

// =============================================================================
// BLOCK CONTEXT
// =============================================================================

/// Block context for execution.
///
/// Carries the two consensus-level facts authorization depends on: the
/// ledger height and the designated block producer (coinbase).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Block number (ledger height).
    pub number: u64,
    /// Block timestamp (unix seconds).
    pub timestamp: u64,
    /// Coinbase address (block producer).
    pub coinbase: Address,
    /// Chain ID (EIP-155).
    pub chain_id: u64,
}

impl BlockContext {
    /// Creates a block context at `number` produced by `coinbase`.
    #[must_use]
    pub fn new(number: u64, coinbase: Address) -> Self {
        Self {
            number,
            coinbase,
            ..Self::default()
        }
    }
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            coinbase: Address::ZERO,
            chain_id: 1,
        }
    }
}

// =============================================================================
// EXECUTION CONTEXT
// =============================================================================

/// Execution context for a call into a system contract.
///
/// A delegated invocation keeps `caller` and `address`, so authorization
/// predicates evaluated inside a batch see the original external caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Identity the call is attributed to.
    pub caller: Address,
    /// The system contract being executed.
    pub address: Address,
    /// Block context.
    pub block: BlockContext,
    /// Nesting depth (0 for the external call).
    pub depth: u16,
}

impl ExecutionContext {
    /// Creates the context for an external call.
    #[must_use]
    pub fn new(caller: Address, address: Address, block: BlockContext) -> Self {
        Self {
            caller,
            address,
            block,
            depth: 0,
        }
    }

    /// Creates a child context for a self-directed delegated invocation.
    ///
    /// Returns None once the nesting limit is reached.
    #[must_use]
    pub fn child_delegatecall(&self) -> Option<Self> {
        let depth = self.depth.checked_add(1)?;
        if depth > limits::MAX_CALL_DEPTH {
            return None;
        }
        Some(Self {
            caller: self.caller,   // Preserves caller
            address: self.address, // Preserves storage context
            block: self.block.clone(),
            depth,
        })
    }

    /// Ledger height of the enclosing block.
    #[must_use]
    pub fn height(&self) -> u64 {
        self.block.number
    }
}

// =============================================================================
// DELEGATE OUTCOME
// =============================================================================

/// Result of a self-directed delegated invocation.
///
/// Failure keeps the raw payload (if any) so the caller can re-raise it
/// unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DelegateOutcome {
    /// The nested call succeeded with this raw output.
    Success(Bytes),
    /// The nested call failed, with or without a payload.
    Failure(Option<Bytes>),
}

// =============================================================================
// INVOCATION RESULT
// =============================================================================

/// Result of one external invocation, as reported across the service boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvocationResult {
    /// Whether the invocation succeeded (and its effects were committed).
    pub success: bool,
    /// Raw output.
    pub output: Bytes,
    /// Raw failure payload, if the failure carried one.
    pub revert_data: Option<Bytes>,
    /// Human-readable failure description.
    pub revert_reason: Option<String>,
    /// Logs committed by the invocation.
    pub logs: Vec<Log>,
}

impl InvocationResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(output: Bytes, logs: Vec<Log>) -> Self {
        Self {
            success: true,
            output,
            revert_data: None,
            revert_reason: None,
            logs,
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failure(revert_data: Option<Bytes>, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            output: Bytes::new(),
            revert_data,
            revert_reason: Some(reason.into()),
            logs: Vec::new(),
        }
    }
}

// =============================================================================
// LOG (EVENT)
// =============================================================================

/// Emitted log (event) from system contract execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// Contract address that emitted the log.
    pub address: Address,
    /// Indexed topics (up to 4).
    pub topics: Vec<Hash>,
    /// Non-indexed data.
    pub data: Bytes,
}

impl Log {
    /// Creates a new log.
    #[must_use]
    pub fn new(address: Address, topics: Vec<Hash>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
