//! # Event Schema (EDA Compliance)
//!
//! Defines the IPC message payloads for the System Contracts subsystem.
//! These messages are wrapped in `AuthenticatedMessage<T>` for transport.
//!
//! ## Architecture Compliance (Architecture.md v2.3, IPC-MATRIX.md)
//!
//! - **Envelope-Only Identity (v2.2):** NO `requester_id` fields in payloads
//! - **Correlation IDs:** All request/response pairs use `correlation_id`
//! - **Security Boundaries:** Validated via `envelope.sender_id`
//!
//! ## Authorized Senders (per IPC-MATRIX.md Subsystem 18)
//!
//! | Message Type | Authorized Sender(s) |
//! |--------------|---------------------|
//! | `InvokeSystemContractRequest` | Subsystems 8, 17 ONLY |

use crate::domain::entities::{BlockContext, InvocationResult, Log};
use crate::domain::value_objects::{Address, Bytes};
use serde::{Deserialize, Serialize};

// =============================================================================
// INBOUND EVENTS (From Other Subsystems)
// =============================================================================

/// Request to invoke a system contract.
///
/// ## IPC-MATRIX.md Security
///
/// - Authorized senders: Subsystem 8 (Consensus), Subsystem 17 (Block Production)
/// - Envelope validation: `envelope.sender_id` MUST be 8 or 17
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvokeRequestPayload {
    // NO requester_id - per Envelope-Only Identity v2.2
    /// Identity the call is attributed to (block producer, peer contract, ...).
    pub caller: Address,
    /// Encoded calldata: selector followed by arguments.
    pub calldata: Bytes,
    /// Block the call executes in.
    pub block_context: BlockContext,
}

/// Response to a system contract invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResponsePayload {
    /// Whether the invocation succeeded and was committed.
    pub success: bool,
    /// Raw output.
    pub output: Bytes,
    /// Raw failure payload, forwarded unchanged.
    pub revert_data: Option<Bytes>,
    /// Human-readable failure reason.
    pub revert_reason: Option<String>,
    /// Logs committed by the invocation.
    pub logs: Vec<Log>,
}

impl From<InvocationResult> for InvokeResponsePayload {
    fn from(result: InvocationResult) -> Self {
        Self {
            success: result.success,
            output: result.output,
            revert_data: result.revert_data,
            revert_reason: result.revert_reason,
            logs: result.logs,
        }
    }
}

// =============================================================================
// SUBSYSTEM ID VALIDATION
// =============================================================================

/// Subsystem IDs for validation.
pub mod subsystem_ids {
    /// Consensus (applies system transactions while validating blocks).
    pub const CONSENSUS: u8 = 8;

    /// Block Production (injects system transactions into new blocks).
    pub const BLOCK_PRODUCTION: u8 = 17;

    /// System Contracts (this subsystem).
    pub const SYSTEM_CONTRACTS: u8 = 18;

    /// Senders allowed to send `InvokeSystemContractRequest`.
    pub const INVOKE_SENDERS: [u8; 2] = [CONSENSUS, BLOCK_PRODUCTION];

    /// Validates that sender is authorized for `InvokeSystemContractRequest`.
    #[must_use]
    pub fn is_authorized_invoke_sender(sender_id: u8) -> bool {
        INVOKE_SENDERS.contains(&sender_id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
