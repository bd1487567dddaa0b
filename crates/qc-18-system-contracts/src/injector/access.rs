//! # Access Control
//!
//! Authorization predicates a system contract operation evaluates at entry.
//! Each compares the caller (or the ledger height) against a consensus-level
//! identity and fails fast with an error carrying what was expected.
//!
//! Inside a batch the caller is still the original external caller, since
//! delegated invocations preserve it.

use crate::domain::entities::ExecutionContext;
use crate::domain::peers::PeerSet;
use crate::errors::InjectorError;
use crate::injector::InjectorContext;
use tracing::debug;

/// Caller must be the current block producer.
pub fn only_coinbase(ctx: &ExecutionContext) -> Result<(), InjectorError> {
    if ctx.caller == ctx.block.coinbase {
        return Ok(());
    }
    debug!(caller = %ctx.caller, coinbase = %ctx.block.coinbase, "Rejected: not block producer");
    Err(InjectorError::OnlyCoinbase {
        expected: ctx.block.coinbase,
    })
}

/// Caller must be the current block producer or the system reward peer.
pub fn only_coinbase_or_system_reward(
    peers: &PeerSet,
    ctx: &ExecutionContext,
) -> Result<(), InjectorError> {
    if ctx.caller == peers.system_reward() {
        return Ok(());
    }
    only_coinbase(ctx)
}

/// Caller must be the slashing indicator peer.
pub fn only_slashing_indicator(
    peers: &PeerSet,
    ctx: &ExecutionContext,
) -> Result<(), InjectorError> {
    if ctx.caller == peers.slashing_indicator() {
        return Ok(());
    }
    debug!(caller = %ctx.caller, peer = ?peers.kind_of(ctx.caller), "Rejected: not slashing indicator");
    Err(InjectorError::OnlySlashingIndicator)
}

/// Caller must be the governance peer.
pub fn only_governance(peers: &PeerSet, ctx: &ExecutionContext) -> Result<(), InjectorError> {
    if ctx.caller == peers.governance() {
        return Ok(());
    }
    debug!(caller = %ctx.caller, peer = ?peers.kind_of(ctx.caller), "Rejected: not governance");
    Err(InjectorError::OnlyGovernance)
}

/// Ledger height must equal `height`.
pub fn only_block(ctx: &ExecutionContext, height: u64) -> Result<(), InjectorError> {
    if ctx.height() == height {
        return Ok(());
    }
    debug!(current = ctx.height(), expected = height, "Rejected: wrong height");
    Err(InjectorError::OnlyBlock { expected: height })
}

/// The initializer must be running (the delayed payload executes in this window).
pub fn only_initializing(injector: &InjectorContext) -> Result<(), InjectorError> {
    if injector.guard_word()?.initializing {
        return Ok(());
    }
    Err(InjectorError::NotInitializing)
}

/// The gate an operation declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// No restriction.
    Anyone,
    /// Current block producer.
    Coinbase,
    /// Block producer or the system reward peer.
    CoinbaseOrSystemReward,
    /// Slashing indicator peer.
    SlashingIndicator,
    /// Governance peer.
    Governance,
    /// Fixed ledger height.
    Block(u64),
    /// Inside the initializer.
    Initializing,
}

impl Access {
    /// Evaluates this gate for a call into `injector`.
    pub fn check(self, injector: &InjectorContext, ctx: &ExecutionContext) -> Result<(), InjectorError> {
        match self {
            Self::Anyone => Ok(()),
            Self::Coinbase => only_coinbase(ctx),
            Self::CoinbaseOrSystemReward => only_coinbase_or_system_reward(injector.peers(), ctx),
            Self::SlashingIndicator => only_slashing_indicator(injector.peers(), ctx),
            Self::Governance => only_governance(injector.peers(), ctx),
            Self::Block(height) => only_block(ctx, height),
            Self::Initializing => only_initializing(injector),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
