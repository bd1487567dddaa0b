//! # Driving Ports (API - Inbound)
//!
//! These are the interfaces exposed by the System Contracts subsystem.
//!
//! ## Architecture Compliance (Architecture.md v2.3)
//!
//! - [`SystemContract`] is the seam a concrete system contract (staking,
//!   governance, ...) implements to sit on top of the injector base
//! - [`InjectorApi`] is the base surface every system contract exposes; it is
//!   blanket-implemented for all [`SystemContract`]s in `injector::dispatch`
//! - [`SystemContractApi`] is the async surface the service offers the node

use crate::domain::entities::{BlockContext, DelegateOutcome, ExecutionContext, InvocationResult};
use crate::domain::peers::PeerSet;
use crate::domain::value_objects::{Address, Bytes, Selector};
use crate::errors::InjectorError;
use crate::injector::InjectorContext;
use async_trait::async_trait;

// =============================================================================
// SYSTEM CONTRACT (derived unit hook)
// =============================================================================

/// A system contract built on the injector base.
///
/// The base surface (`init`, `useDelayedInitializer`, `isInitialized`,
/// `multicall`) is routed before [`SystemContract::handle_call`] sees a call.
pub trait SystemContract: Send + Sync {
    /// The injector base this unit is built on.
    fn injector(&self) -> &InjectorContext;

    /// Mutable access to the injector base.
    fn injector_mut(&mut self) -> &mut InjectorContext;

    /// Routes an operation declared by the derived unit.
    ///
    /// Each operation evaluates its own access predicate against `ctx`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(output))` - operation ran
    /// * `Ok(None)` - no operation matches `selector`
    /// * `Err(_)` - operation failed; the whole invocation unwinds
    fn handle_call(
        &mut self,
        ctx: &ExecutionContext,
        selector: Selector,
        args: &[u8],
    ) -> Result<Option<Bytes>, InjectorError> {
        let _ = (ctx, selector, args);
        Ok(None)
    }
}

// =============================================================================
// INJECTOR API (base surface)
// =============================================================================

/// Lifecycle, batch and dispatch surface shared by every system contract.
///
/// Every mutating operation is atomic: on failure no storage write or log of
/// the operation survives.
pub trait InjectorApi {
    /// External entry point: routes encoded calldata to an exposed operation.
    fn call(&mut self, ctx: &ExecutionContext, calldata: &[u8]) -> Result<Bytes, InjectorError>;

    /// Self-directed delegated invocation, keeping caller and storage context.
    fn delegate(&mut self, ctx: &ExecutionContext, calldata: &[u8]) -> DelegateOutcome;

    /// Runs each encoded request in order; all succeed or the batch fails
    /// with the first failure's payload.
    fn batch(
        &mut self,
        ctx: &ExecutionContext,
        requests: &[Bytes],
    ) -> Result<Vec<Bytes>, InjectorError>;

    /// Stores the delayed initializer payload. Height 0 only; last write wins.
    fn register_delayed_payload(
        &mut self,
        ctx: &ExecutionContext,
        payload: &[u8],
    ) -> Result<(), InjectorError>;

    /// Fires the one-time guard, running the delayed payload first. Height 1 only.
    fn init(&mut self, ctx: &ExecutionContext) -> Result<(), InjectorError>;

    /// Reads the guard state from its fixed header position.
    fn is_initialized(&self) -> Result<bool, InjectorError>;
}

// =============================================================================
// SYSTEM CONTRACT API (service surface)
// =============================================================================

/// Async API the node uses to drive a hosted system contract.
#[async_trait]
pub trait SystemContractApi: Send + Sync {
    /// Executes encoded calldata from `caller` in `block`.
    ///
    /// Failures are reported inside the result, never as `Err`.
    async fn invoke(&self, caller: Address, block: &BlockContext, calldata: &[u8])
        -> InvocationResult;

    /// Reports the guard state.
    async fn is_initialized(&self) -> Result<bool, InjectorError>;

    /// The peer set the hosted contract was constructed with.
    async fn peers(&self) -> PeerSet;
}
