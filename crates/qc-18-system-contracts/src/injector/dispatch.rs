//! # Dispatch
//!
//! Calldata routing, self-directed delegated invocation and batched
//! invocation. [`InjectorApi`] is implemented here for every
//! [`SystemContract`], so a derived unit only supplies `handle_call`.
//!
//! ## Atomicity
//!
//! Every external call, batch and initialization runs in its own journal
//! frame. A failure anywhere below drops the frame, so the invocation leaves
//! no storage write and no log behind.

use crate::domain::abi::{self, Decoder, Token};
use crate::domain::entities::{DelegateOutcome, ExecutionContext};
use crate::domain::invariants::{check_batch_invariant, check_call_depth_invariant, limits};
use crate::domain::layout::GuardWord;
use crate::domain::services::{keccak256, selector, signatures};
use crate::domain::value_objects::{Bytes, Selector, U256};
use crate::errors::InjectorError;
use crate::injector::access::only_block;
use crate::injector::atomic;
use crate::ports::inbound::{InjectorApi, SystemContract};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Guard version written by `init`.
const INITIALIZED_VERSION: u8 = 1;

/// Height at which the delayed payload may be registered.
const REGISTRATION_HEIGHT: u64 = 0;

/// Height at which `init` may run.
const INIT_HEIGHT: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BaseOp {
    UseDelayedInitializer,
    Init,
    IsInitialized,
    Multicall,
}

static BASE_SELECTORS: LazyLock<HashMap<Selector, BaseOp>> = LazyLock::new(|| {
    HashMap::from([
        (
            selector(signatures::USE_DELAYED_INITIALIZER),
            BaseOp::UseDelayedInitializer,
        ),
        (selector(signatures::INIT), BaseOp::Init),
        (selector(signatures::IS_INITIALIZED), BaseOp::IsInitialized),
        (selector(signatures::MULTICALL), BaseOp::Multicall),
    ])
});

/// Returns true if `selector` belongs to the base surface.
#[must_use]
pub fn is_base_selector(selector: &Selector) -> bool {
    BASE_SELECTORS.contains_key(selector)
}

impl<T: SystemContract + ?Sized> InjectorApi for T {
    fn call(&mut self, ctx: &ExecutionContext, calldata: &[u8]) -> Result<Bytes, InjectorError> {
        if !check_call_depth_invariant(ctx) {
            return Err(InjectorError::CallDepthExceeded {
                depth: ctx.depth,
                max: limits::MAX_CALL_DEPTH,
            });
        }
        atomic(self, |contract| route(contract, ctx, calldata))
    }

    fn delegate(&mut self, ctx: &ExecutionContext, calldata: &[u8]) -> DelegateOutcome {
        let Some(child) = ctx.child_delegatecall() else {
            debug!(depth = ctx.depth, "Delegated call exceeds depth limit");
            return DelegateOutcome::Failure(None);
        };
        match self.call(&child, calldata) {
            Ok(output) => DelegateOutcome::Success(output),
            Err(err) => DelegateOutcome::Failure(err.revert_data()),
        }
    }

    fn batch(
        &mut self,
        ctx: &ExecutionContext,
        requests: &[Bytes],
    ) -> Result<Vec<Bytes>, InjectorError> {
        debug!(items = requests.len(), caller = %ctx.caller, "Batch started");
        let results = atomic(self, |contract| {
            let mut results = Vec::with_capacity(requests.len());
            for (index, request) in requests.iter().enumerate() {
                let output = fast_delegate(contract, ctx, request.as_slice()).map_err(|err| {
                    debug!(index, error = %err, "Batch item failed, unwinding batch");
                    err
                })?;
                results.push(output);
            }
            Ok(results)
        })?;
        debug_assert!(check_batch_invariant(requests, &results));
        Ok(results)
    }

    fn register_delayed_payload(
        &mut self,
        ctx: &ExecutionContext,
        payload: &[u8],
    ) -> Result<(), InjectorError> {
        only_block(ctx, REGISTRATION_HEIGHT)?;
        atomic(self, |contract| {
            contract.injector_mut().set_delayed_payload(payload)?;
            debug!(len = payload.len(), "Delayed initializer registered");
            Ok(())
        })
    }

    fn init(&mut self, ctx: &ExecutionContext) -> Result<(), InjectorError> {
        // The guard is consulted first so a repeated init fails the same way
        // at every height.
        let guard = self.injector().guard_word()?;
        if guard.is_initialized() || guard.initializing {
            return Err(InjectorError::AlreadyInitialized);
        }
        only_block(ctx, INIT_HEIGHT)?;

        atomic(self, |contract| {
            contract.injector_mut().set_guard_word(GuardWord {
                initialized: INITIALIZED_VERSION,
                initializing: true,
            })?;

            let payload = contract.injector_mut().take_delayed_payload()?;
            if !payload.is_empty() {
                fast_delegate(contract, ctx, &payload)?;
            }

            contract.injector_mut().set_guard_word(GuardWord {
                initialized: INITIALIZED_VERSION,
                initializing: false,
            })?;
            contract.injector_mut().emit(
                vec![keccak256(signatures::EVENT_INITIALIZED.as_bytes())],
                Bytes::from_slice(&abi::uint_word(U256::from(INITIALIZED_VERSION))),
            );

            info!(
                contract = %contract.injector().address(),
                payload_len = payload.len(),
                "System contract initialized"
            );
            Ok(())
        })
    }

    fn is_initialized(&self) -> Result<bool, InjectorError> {
        Ok(self.injector().guard_word()?.is_initialized())
    }
}

/// Delegated call that re-raises the nested failure as an error.
///
/// A payload is recovered as-is; a failure without one becomes
/// [`InjectorError::DelegateCallFailed`].
fn fast_delegate<C: SystemContract + ?Sized>(
    contract: &mut C,
    ctx: &ExecutionContext,
    calldata: &[u8],
) -> Result<Bytes, InjectorError> {
    match contract.delegate(ctx, calldata) {
        DelegateOutcome::Success(output) => Ok(output),
        DelegateOutcome::Failure(Some(payload)) => {
            Err(InjectorError::from_revert_data(payload.as_slice()))
        }
        DelegateOutcome::Failure(None) => Err(InjectorError::DelegateCallFailed),
    }
}

fn route<C: SystemContract + ?Sized>(
    contract: &mut C,
    ctx: &ExecutionContext,
    calldata: &[u8],
) -> Result<Bytes, InjectorError> {
    let (selector, args) = abi::split_call(calldata)?;
    let decoder = Decoder::new(args);

    match BASE_SELECTORS.get(&selector).copied() {
        Some(BaseOp::UseDelayedInitializer) => {
            let payload = decoder.bytes(0)?;
            contract.register_delayed_payload(ctx, &payload)?;
            Ok(Bytes::new())
        }
        Some(BaseOp::Init) => {
            contract.init(ctx)?;
            Ok(Bytes::new())
        }
        Some(BaseOp::IsInitialized) => {
            let initialized = contract.is_initialized()?;
            Ok(Bytes::from_vec(abi::encode(&[Token::Bool(initialized)])))
        }
        Some(BaseOp::Multicall) => {
            let requests = decoder.bytes_array(0)?;
            let results = contract.batch(ctx, &requests)?;
            Ok(Bytes::from_vec(abi::encode(&[Token::BytesArray(results)])))
        }
        None => contract
            .handle_call(ctx, selector, args)?
            .ok_or_else(|| {
                debug!(%selector, "No operation matches selector");
                InjectorError::UnknownSelector(selector)
            }),
    }
}

// =============================================================================
// TESTS
// =============================================================================
