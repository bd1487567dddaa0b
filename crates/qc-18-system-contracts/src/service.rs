//! # System Contract Service
//!
//! Hosts one system contract behind the Event Bus.
//! Implements the EDA (Event-Driven Architecture) pattern per Architecture.md.
//!
//! ## Architecture Compliance
//!
//! - Subscribes to `InvokeSystemContractRequest` from Subsystems 8, 17
//! - Publishes results via Event Bus
//! - NO direct subsystem-to-subsystem calls
//!
//! ## Security
//!
//! - Validates `sender_id` from envelope per IPC-MATRIX.md
//! - All identity from `AuthenticatedMessage.sender_id` only
//!
//! Invocations are serialized through a write lock, matching the ledger's
//! one-transaction-at-a-time execution.

use crate::adapters::InMemoryStorage;
use crate::config::ServiceConfig;
use crate::domain::entities::{BlockContext, ExecutionContext, InvocationResult};
use crate::domain::peers::{PeerKind, PeerSet};
use crate::domain::value_objects::Address;
use crate::errors::{InjectorError, IpcError};
use crate::events::{subsystem_ids, InvokeRequestPayload, InvokeResponsePayload};
use crate::injector::InjectorContext;
use crate::ports::inbound::{InjectorApi, SystemContract, SystemContractApi};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Statistics for the System Contract Service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Total invocations executed.
    pub invocations: u64,
    /// Committed invocations.
    pub successful_invocations: u64,
    /// Failed (rolled back) invocations.
    pub failed_invocations: u64,
    /// Failed invocations rejected by an authorization predicate.
    pub unauthorized_invocations: u64,
    /// Logs committed.
    pub logs_emitted: u64,
    /// Average execution time in microseconds.
    pub avg_execution_time_us: u64,
    /// Rejected requests (unauthorized sender).
    pub rejected_requests: u64,
}

/// The System Contract Service.
///
/// This service:
/// 1. Receives invocation requests from the Event Bus
/// 2. Runs them atomically against the hosted contract
/// 3. Returns output, raw failure payload and committed logs
/// 4. Maintains invocation statistics
pub struct SystemContractService<C: SystemContract> {
    /// Service configuration.
    config: ServiceConfig,
    /// Hosted contract.
    contract: Arc<RwLock<C>>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<C: SystemContract> SystemContractService<C> {
    /// Create a new service hosting `contract`.
    pub fn new(contract: C, config: ServiceConfig) -> Self {
        Self {
            config,
            contract: Arc::new(RwLock::new(contract)),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Read access to the hosted contract.
    pub async fn contract(&self) -> RwLockReadGuard<'_, C> {
        self.contract.read().await
    }

    /// Handle an invocation request from the Event Bus.
    ///
    /// # Security
    ///
    /// Validates that the `sender_id` is authorized per IPC-MATRIX.md:
    /// - `InvokeSystemContractRequest`: `sender_id` must be 8 or 17
    #[instrument(skip(self, payload), fields(correlation_id = %correlation_id))]
    pub async fn handle_invoke(
        &self,
        sender_id: u8,
        correlation_id: Uuid,
        payload: InvokeRequestPayload,
    ) -> Result<InvokeResponsePayload, IpcError> {
        // Security: Validate sender
        if !subsystem_ids::is_authorized_invoke_sender(sender_id) {
            warn!(
                sender_id = sender_id,
                "Unauthorized sender for InvokeSystemContractRequest"
            );
            self.stats.write().await.rejected_requests += 1;
            return Err(IpcError::UnauthorizedSender {
                sender_id,
                allowed: subsystem_ids::INVOKE_SENDERS.to_vec(),
            });
        }

        info!(
            caller = %payload.caller,
            height = payload.block_context.number,
            "Processing system contract invocation"
        );

        let result = self
            .invoke_internal(
                payload.caller,
                &payload.block_context,
                payload.calldata.as_slice(),
            )
            .await;

        Ok(InvokeResponsePayload::from(result))
    }

    async fn invoke_internal(
        &self,
        caller: Address,
        block: &BlockContext,
        calldata: &[u8],
    ) -> InvocationResult {
        let start = Instant::now();

        let (outcome, logs) = {
            let mut contract = self.contract.write().await;
            let ctx = ExecutionContext::new(caller, contract.injector().address(), block.clone());
            let outcome = contract.call(&ctx, calldata);
            (outcome, contract.injector_mut().take_logs())
        };

        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        let unauthorized = matches!(&outcome, Err(err) if err.is_unauthorized());
        let result = match outcome {
            Ok(output) => {
                if self.config.enable_tracing {
                    for log in &logs {
                        debug!(address = %log.address, topics = log.topics.len(), "Log committed");
                    }
                }
                debug!(output_len = output.len(), logs = logs.len(), "Invocation committed");
                InvocationResult::success(output, logs)
            }
            Err(err) => {
                debug!(error = %err, "Invocation rolled back");
                failure_result(&err)
            }
        };

        // Update statistics
        {
            let mut stats = self.stats.write().await;
            stats.invocations += 1;
            if result.success {
                stats.successful_invocations += 1;
                stats.logs_emitted += result.logs.len() as u64;
            } else {
                stats.failed_invocations += 1;
                if unauthorized {
                    stats.unauthorized_invocations += 1;
                }
            }
            let total = stats.invocations;
            stats.avg_execution_time_us =
                (stats.avg_execution_time_us * (total - 1) + elapsed_us) / total;
        }

        result
    }
}

/// Maps a rolled back invocation to the result reported to the node.
fn failure_result(err: &InjectorError) -> InvocationResult {
    let reason = err.reason_string().unwrap_or_else(|| err.to_string());
    InvocationResult::failure(err.revert_data(), reason)
}

/// Create a service hosting a bare injector with in-memory storage (for testing).
#[must_use]
pub fn create_test_service() -> SystemContractService<InjectorContext> {
    let injector = InjectorContext::new(
        PeerKind::ChainConfig.well_known_address(),
        PeerSet::well_known(),
        InMemoryStorage::new(),
    );
    SystemContractService::new(injector, ServiceConfig::default())
}

// =============================================================================
// SystemContractApi Implementation
// =============================================================================

#[async_trait]
impl<C: SystemContract> SystemContractApi for SystemContractService<C> {
    async fn invoke(
        &self,
        caller: Address,
        block: &BlockContext,
        calldata: &[u8],
    ) -> InvocationResult {
        self.invoke_internal(caller, block, calldata).await
    }

    async fn is_initialized(&self) -> Result<bool, InjectorError> {
        InjectorApi::is_initialized(&*self.contract.read().await)
    }

    async fn peers(&self) -> PeerSet {
        *self.contract.read().await.injector().peers()
    }
}

// =============================================================================
// TESTS
// =============================================================================
