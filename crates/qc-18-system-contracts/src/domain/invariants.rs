//! # Domain Invariants
//!
//! Invariants every system contract built on the injector relies on.
//!
//! - INVARIANT-1: Header size is constant across revisions
//! - INVARIANT-2: Peer references are non-null
//! - INVARIANT-3: Batch results correspond 1:1 with requests
//! - INVARIANT-4: Derived fields live after the header
//! - INVARIANT-5: Call depth limit

use crate::domain::entities::ExecutionContext;
use crate::domain::layout::{ReservedLayout, LAYOUT_OFFSET};
use crate::domain::peers::{PeerKind, PeerSet};
use crate::domain::value_objects::{Bytes, StorageKey};

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Header size is constant across revisions.
#[must_use]
pub fn check_header_invariant(layout: &ReservedLayout) -> bool {
    layout.header_slots() == LAYOUT_OFFSET
}

/// INVARIANT-2: Every peer reference is non-null.
#[must_use]
pub fn check_peer_invariant(peers: &PeerSet) -> Option<PeerKind> {
    peers.iter().find(|(_, a)| a.is_zero()).map(|(k, _)| k)
}

/// INVARIANT-3: One result per request, none dropped.
#[must_use]
pub fn check_batch_invariant(requests: &[Bytes], results: &[Bytes]) -> bool {
    requests.len() == results.len()
}

/// INVARIANT-4: A derived unit's slot lies outside the header.
#[must_use]
pub fn check_derived_slot_invariant(layout: &ReservedLayout, slot: &StorageKey) -> bool {
    !layout.is_header_slot(slot)
}

/// INVARIANT-5: Nesting never exceeds the call depth limit.
#[must_use]
pub fn check_call_depth_invariant(ctx: &ExecutionContext) -> bool {
    ctx.depth <= limits::MAX_CALL_DEPTH
}

/// Check the construction-time invariants at once.
#[must_use]
pub fn check_all_invariants(layout: &ReservedLayout, peers: &PeerSet) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_header_invariant(layout) {
        violations.push(InvariantViolation::HeaderSizeChanged {
            expected: LAYOUT_OFFSET,
            actual: layout.header_slots(),
        });
    }

    if let Some(kind) = check_peer_invariant(peers) {
        violations.push(InvariantViolation::NullPeer(kind));
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT RESULT TYPES
// =============================================================================

/// Result of invariant checking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Header no longer spans the fixed slot count.
    HeaderSizeChanged { expected: u64, actual: u64 },
    /// A peer reference is the zero address.
    NullPeer(PeerKind),
}

// =============================================================================
// LIMITS
// =============================================================================

/// Execution limits.
pub mod limits {
    /// Maximum nesting depth of delegated invocations.
    ///
    /// Dispatch recurses once per level, so this must fit a 2 MiB worker
    /// stack in unoptimized builds.
    pub const MAX_CALL_DEPTH: u16 = 64;
}

// =============================================================================
// TESTS
// =============================================================================
