//! # Error Types
//!
//! All error types for system contract execution.
//!
//! Every [`InjectorError`] maps to the raw failure payload a caller observes
//! ([`InjectorError::revert_data`]). Payloads cross nested invocations
//! unchanged, and [`InjectorError::from_revert_data`] recovers the typed
//! error on the far side.

use crate::domain::abi::{self, Decoder, Token};
use crate::domain::peers::PeerKind;
use crate::domain::services::{selector, signatures};
use crate::domain::value_objects::{Address, Bytes, Selector, U256};
use thiserror::Error;

/// Reason string of the one-time guard when it has already fired.
pub const ALREADY_INITIALIZED_REASON: &str = "Initializable: contract is already initialized";

/// Reason string of the one-time guard outside the initializing window.
pub const NOT_INITIALIZING_REASON: &str = "Initializable: contract is not initializing";

// =============================================================================
// INJECTOR ERRORS
// =============================================================================

/// Errors raised by a system contract call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InjectorError {
    /// Caller is not the current block producer.
    #[error("only block producer {expected:?} may call")]
    OnlyCoinbase { expected: Address },

    /// Caller is not the slashing indicator.
    #[error("only the slashing indicator may call")]
    OnlySlashingIndicator,

    /// Caller is not governance.
    #[error("only governance may call")]
    OnlyGovernance,

    /// Operation is only allowed at a specific ledger height.
    #[error("only allowed at block {expected}")]
    OnlyBlock { expected: u64 },

    /// The one-time guard has already fired.
    #[error("already initialized")]
    AlreadyInitialized,

    /// Operation is only allowed while the initializer runs.
    #[error("not initializing")]
    NotInitializing,

    /// No exposed operation matches the selector.
    #[error("unknown selector: {0}")]
    UnknownSelector(Selector),

    /// Calldata could not be decoded.
    #[error("malformed call: {0}")]
    MalformedCall(#[from] AbiError),

    /// Delegated invocation nesting exceeded the limit.
    #[error("call depth exceeded: {depth} > {max}")]
    CallDepthExceeded { depth: u16, max: u16 },

    /// Persisted state access failed.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// A failure carrying a raw payload this layer does not interpret.
    #[error("reverted: {0:?}")]
    Reverted(Bytes),

    /// A nested invocation failed without a payload.
    #[error("delegated call failed")]
    DelegateCallFailed,
}

impl InjectorError {
    /// Builds a revert with a plain reason string.
    #[must_use]
    pub fn reason(message: impl Into<String>) -> Self {
        Self::from_revert_data(reason_payload(&message.into()).as_slice())
    }

    /// Builds a revert with a custom error signature and arguments.
    #[must_use]
    pub fn custom(signature: &str, args: &[Token]) -> Self {
        Self::from_revert_data(abi::encode_call(selector(signature), args).as_slice())
    }

    /// Raw failure payload observed by the caller. None means a bare failure.
    #[must_use]
    pub fn revert_data(&self) -> Option<Bytes> {
        match self {
            Self::OnlyCoinbase { expected } => Some(abi::encode_call(
                selector(signatures::ERR_ONLY_COINBASE),
                &[Token::Address(*expected)],
            )),
            Self::OnlySlashingIndicator => Some(abi::encode_call(
                selector(signatures::ERR_ONLY_SLASHING_INDICATOR),
                &[],
            )),
            Self::OnlyGovernance => Some(abi::encode_call(
                selector(signatures::ERR_ONLY_GOVERNANCE),
                &[],
            )),
            Self::OnlyBlock { expected } => Some(abi::encode_call(
                selector(signatures::ERR_ONLY_BLOCK),
                &[Token::Uint(U256::from(*expected))],
            )),
            Self::AlreadyInitialized => Some(reason_payload(ALREADY_INITIALIZED_REASON)),
            Self::NotInitializing => Some(reason_payload(NOT_INITIALIZING_REASON)),
            Self::Reverted(data) => Some(data.clone()),
            Self::UnknownSelector(_)
            | Self::MalformedCall(_)
            | Self::CallDepthExceeded { .. }
            | Self::State(_)
            | Self::DelegateCallFailed => None,
        }
    }

    /// Recovers an error from a raw payload.
    ///
    /// Known payloads map back to their typed variant; anything else is kept
    /// verbatim as [`InjectorError::Reverted`]. Empty payloads are bare
    /// failures.
    #[must_use]
    pub fn from_revert_data(data: &[u8]) -> Self {
        let Some(sel) = Selector::from_prefix(data) else {
            return if data.is_empty() {
                Self::DelegateCallFailed
            } else {
                Self::Reverted(Bytes::from_slice(data))
            };
        };
        let args = Decoder::new(&data[4..]);

        let decoded = if sel == selector(signatures::ERR_ONLY_COINBASE) {
            args.address(0)
                .ok()
                .map(|expected| Self::OnlyCoinbase { expected })
        } else if sel == selector(signatures::ERR_ONLY_SLASHING_INDICATOR) {
            Some(Self::OnlySlashingIndicator)
        } else if sel == selector(signatures::ERR_ONLY_GOVERNANCE) {
            Some(Self::OnlyGovernance)
        } else if sel == selector(signatures::ERR_ONLY_BLOCK) {
            args.u64(0).ok().map(|expected| Self::OnlyBlock { expected })
        } else if sel == selector(signatures::ERR_REASON) {
            match args.string(0).ok().as_deref() {
                Some(ALREADY_INITIALIZED_REASON) => Some(Self::AlreadyInitialized),
                Some(NOT_INITIALIZING_REASON) => Some(Self::NotInitializing),
                _ => None,
            }
        } else {
            None
        };

        // Only accept the typed form if it re-encodes to the same bytes.
        match decoded {
            Some(err) if err.revert_data().as_ref().map(Bytes::as_slice) == Some(data) => err,
            _ => Self::Reverted(Bytes::from_slice(data)),
        }
    }

    /// Decodes a plain reason string, if the payload carries one.
    #[must_use]
    pub fn reason_string(&self) -> Option<String> {
        let data = self.revert_data()?;
        let (sel, args) = abi::split_call(data.as_slice()).ok()?;
        if sel != selector(signatures::ERR_REASON) {
            return None;
        }
        Decoder::new(args).string(0).ok()
    }

    /// Returns true for the authorization failures.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::OnlyCoinbase { .. } | Self::OnlySlashingIndicator | Self::OnlyGovernance
        )
    }
}

fn reason_payload(message: &str) -> Bytes {
    abi::encode_call(
        selector(signatures::ERR_REASON),
        &[Token::String(message.to_string())],
    )
}

// =============================================================================
// STATE ERRORS
// =============================================================================

/// Errors from persisted-state access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Persisted state is corrupted.
    #[error("state corruption detected at {0}")]
    Corrupted(String),

    /// Storage backend unavailable.
    #[error("state backend unavailable")]
    Unavailable,

    /// Write attempted into the header through a derived-field accessor.
    #[error("write into reserved header slot")]
    HeaderWrite,
}

// =============================================================================
// ABI ERRORS
// =============================================================================

/// Errors decoding calldata or payloads.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AbiError {
    /// Calldata shorter than a selector.
    #[error("missing selector")]
    MissingSelector,

    /// A word, offset or length points outside the input.
    #[error("read out of bounds")]
    OutOfBounds,

    /// A word holds a value outside the declared type.
    #[error("value out of range")]
    ValueOutOfRange,

    /// A string argument is not UTF-8.
    #[error("invalid utf-8")]
    InvalidUtf8,
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A peer reference is the zero address.
    #[error("peer {0} must not be the zero address")]
    NullPeer(PeerKind),

    /// An address string is not 20 hex bytes.
    #[error("invalid address for {field}: {source}")]
    InvalidAddress {
        field: String,
        #[source]
        source: hex::FromHexError,
    },

    /// Configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

// =============================================================================
// IPC ERRORS
// =============================================================================

/// Errors related to IPC communication.
#[derive(Debug, Error, Clone)]
pub enum IpcError {
    /// Unauthorized sender.
    #[error("unauthorized sender: {sender_id} not in allowed list {allowed:?}")]
    UnauthorizedSender { sender_id: u8, allowed: Vec<u8> },
}

// =============================================================================
// TESTS
// =============================================================================
