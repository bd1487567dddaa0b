//! # System Contract Integration Flows
//!
//! Drives a derived system contract through `SystemContractService` the way
//! Block Production (17) and Consensus (8) do over the event bus.
//!
//! ## Flows Tested:
//!
//! 1. **Genesis**: delayed payload at height 0, `init()` at height 1
//! 2. **Role gates**: producer, system reward, slashing indicator, governance
//! 3. **Batch atomicity**: one failing item unwinds the whole batch
//! 4. **Observers**: guard state read from the fixed header slot

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, ChainConfigContract};
    use qc_18_system_contracts::prelude::*;
    use std::sync::Once;
    use uuid::Uuid;

    static TRACING: Once = Once::new();

    fn init_tracing() {
        TRACING.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        });
    }

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn producer() -> Address {
        Address::new([0xCB; 20])
    }

    fn validator() -> Address {
        Address::new([0x5A; 20])
    }

    struct Harness {
        storage: InMemoryStorage,
        service: SystemContractService<ChainConfigContract>,
    }

    impl Harness {
        fn new() -> Self {
            init_tracing();
            let storage = InMemoryStorage::new();
            let service = SystemContractService::new(
                ChainConfigContract::new(storage.clone()),
                ServiceConfig {
                    enable_tracing: true,
                },
            );
            Self { storage, service }
        }

        async fn send(
            &self,
            sender_id: u8,
            caller: Address,
            height: u64,
            calldata: Bytes,
        ) -> InvokeResponsePayload {
            self.service
                .handle_invoke(
                    sender_id,
                    Uuid::new_v4(),
                    InvokeRequestPayload {
                        caller,
                        calldata,
                        block_context: BlockContext::new(height, producer()),
                    },
                )
                .await
                .expect("authorized sender")
        }

        async fn produce(&self, caller: Address, height: u64, calldata: Bytes) -> InvokeResponsePayload {
            self.send(subsystem_ids::BLOCK_PRODUCTION, caller, height, calldata)
                .await
        }

        async fn genesis(&self, epoch: u64) {
            let payload = fixtures::initialize(epoch);
            let registered = self
                .produce(producer(), 0, fixtures::use_delayed_initializer(&payload))
                .await;
            assert!(registered.success);
            assert!(self.produce(producer(), 1, fixtures::init()).await.success);
        }

        async fn epoch_length(&self) -> U256 {
            let response = self.produce(producer(), 10, fixtures::epoch_length()).await;
            fixtures::decode_uint(&response.output).expect("uint output")
        }
    }

    // =========================================================================
    // GENESIS
    // =========================================================================

    /// Test: delayed payload registered at 0 is applied by init at 1
    #[tokio::test]
    async fn test_genesis_lifecycle() {
        let harness = Harness::new();
        assert!(!harness.service.is_initialized().await.unwrap());
        assert!(!read_initialized(&harness.storage).unwrap());

        harness.genesis(200).await;

        assert!(harness.service.is_initialized().await.unwrap());
        assert!(read_initialized(&harness.storage).unwrap());
        assert_eq!(harness.epoch_length().await, U256::from(200));
        assert!(harness
            .service
            .contract()
            .await
            .injector()
            .delayed_payload()
            .unwrap()
            .is_empty());
    }

    /// Test: init emits exactly one Initialized(1) log
    #[tokio::test]
    async fn test_init_emits_initialized_log() {
        let harness = Harness::new();
        let response = harness.produce(producer(), 1, fixtures::init()).await;

        assert!(response.success);
        assert_eq!(response.logs.len(), 1);
        assert_eq!(
            response.logs[0].address,
            PeerKind::ChainConfig.well_known_address()
        );
        assert_eq!(
            response.logs[0].topics,
            vec![keccak256(b"Initialized(uint8)")]
        );
    }

    /// Test: lifecycle calls outside their heights fail with the height
    #[tokio::test]
    async fn test_lifecycle_height_gates() {
        let harness = Harness::new();

        let late_register = harness
            .produce(
                producer(),
                1,
                fixtures::use_delayed_initializer(&fixtures::initialize(5)),
            )
            .await;
        assert!(!late_register.success);
        assert_eq!(
            late_register.revert_data,
            InjectorError::OnlyBlock { expected: 0 }.revert_data()
        );

        let early_init = harness.produce(producer(), 0, fixtures::init()).await;
        assert_eq!(
            early_init.revert_data,
            InjectorError::OnlyBlock { expected: 1 }.revert_data()
        );

        harness.genesis(100).await;
        let again = harness.produce(producer(), 1, fixtures::init()).await;
        assert!(!again.success);
        assert_eq!(
            again.revert_reason.as_deref(),
            Some("Initializable: contract is already initialized")
        );
    }

    /// Test: isInitialized answers through calldata as a bool word
    #[tokio::test]
    async fn test_is_initialized_calldata() {
        let harness = Harness::new();
        harness.genesis(1).await;

        let response = harness
            .send(subsystem_ids::CONSENSUS, validator(), 50, fixtures::is_initialized())
            .await;
        assert!(response.success);
        assert_eq!(fixtures::decode_uint(&response.output), Some(U256::one()));
    }

    /// Test: the derived initializer cannot run after genesis
    #[tokio::test]
    async fn test_initializer_closed_after_genesis() {
        let harness = Harness::new();
        harness.genesis(100).await;

        let response = harness
            .produce(producer(), 5, fixtures::initialize(1))
            .await;
        assert!(!response.success);
        assert_eq!(
            response.revert_reason.as_deref(),
            Some("Initializable: contract is not initializing")
        );
        assert_eq!(harness.epoch_length().await, U256::from(100));
    }

    // =========================================================================
    // ROLE GATES
    // =========================================================================

    /// Test: governance-only setter rejects everyone but governance
    #[tokio::test]
    async fn test_governance_gate() {
        let harness = Harness::new();
        harness.genesis(100).await;
        let governance = PeerSet::well_known().governance();

        let denied = harness
            .produce(producer(), 5, fixtures::set_epoch_length(300))
            .await;
        assert_eq!(denied.revert_data, InjectorError::OnlyGovernance.revert_data());

        let allowed = harness
            .send(subsystem_ids::CONSENSUS, governance, 5, fixtures::set_epoch_length(300))
            .await;
        assert!(allowed.success);
        assert_eq!(harness.epoch_length().await, U256::from(300));

        let stats = harness.service.stats().await;
        assert_eq!(stats.unauthorized_invocations, 1);
    }

    /// Test: reward accepts producer and system reward, nobody else
    #[tokio::test]
    async fn test_producer_or_system_reward_gate() {
        let harness = Harness::new();
        let system_reward = PeerSet::well_known().system_reward();

        assert!(harness.produce(producer(), 5, fixtures::reward(validator())).await.success);
        assert!(harness
            .produce(system_reward, 5, fixtures::reward(validator()))
            .await
            .success);

        let denied = harness
            .produce(validator(), 5, fixtures::reward(validator()))
            .await;
        assert_eq!(
            InjectorError::from_revert_data(denied.revert_data.unwrap().as_slice()),
            InjectorError::OnlyCoinbase {
                expected: producer()
            }
        );

        let count = harness
            .produce(validator(), 6, fixtures::rewards(validator()))
            .await;
        assert_eq!(fixtures::decode_uint(&count.output), Some(U256::from(2)));
    }

    /// Test: slash accepts only the slashing indicator
    #[tokio::test]
    async fn test_slashing_indicator_gate() {
        let harness = Harness::new();
        let indicator = PeerSet::well_known().slashing_indicator();

        let denied = harness.produce(producer(), 5, fixtures::slash(validator())).await;
        assert_eq!(
            denied.revert_data,
            InjectorError::OnlySlashingIndicator.revert_data()
        );

        let allowed = harness.produce(indicator, 5, fixtures::slash(validator())).await;
        assert!(allowed.success);
    }

    // =========================================================================
    // BATCH
    // =========================================================================

    /// Test: batch results equal the outputs of the same calls made alone
    #[tokio::test]
    async fn test_batch_matches_single_calls() {
        let batched = Harness::new();
        let single = Harness::new();
        let items = vec![
            fixtures::reward(validator()),
            fixtures::reward(validator()),
            fixtures::rewards(validator()),
        ];

        let mut isolated = Vec::new();
        for item in &items {
            isolated.push(single.produce(producer(), 5, item.clone()).await.output);
        }

        let response = batched
            .produce(producer(), 5, fixtures::multicall(items.clone()))
            .await;
        assert!(response.success);

        let results = Decoder::new(response.output.as_slice())
            .bytes_array(0)
            .unwrap();
        assert_eq!(results.len(), items.len());
        assert_eq!(results, isolated);
        assert_eq!(batched.storage.snapshot(), single.storage.snapshot());
    }

    /// Test: batch([ok, fail, ok]) leaves no trace and reports fail's payload
    #[tokio::test]
    async fn test_batch_failure_is_atomic() {
        let harness = Harness::new();
        harness.genesis(100).await;
        let before = harness.storage.snapshot();

        // setEpochLength from the producer fails with OnlyGovernance
        let response = harness
            .produce(
                producer(),
                5,
                fixtures::multicall(vec![
                    fixtures::reward(validator()),
                    fixtures::set_epoch_length(7),
                    fixtures::reward(validator()),
                ]),
            )
            .await;

        assert!(!response.success);
        assert_eq!(response.revert_data, InjectorError::OnlyGovernance.revert_data());
        assert!(response.logs.is_empty());
        assert_eq!(harness.storage.snapshot(), before);
    }

    /// Test: a custom revert reason survives the batch unchanged
    #[tokio::test]
    async fn test_batch_preserves_custom_reason() {
        let harness = Harness::new();
        let governance = PeerSet::well_known().governance();

        let response = harness
            .send(
                subsystem_ids::CONSENSUS,
                governance,
                5,
                fixtures::multicall(vec![fixtures::set_epoch_length(10), fixtures::set_epoch_length(0)]),
            )
            .await;

        assert!(!response.success);
        assert_eq!(
            response.revert_reason.as_deref(),
            Some("epoch length must be positive")
        );
        assert!(harness.storage.is_empty());
    }

    /// Test: governance can batch its own operations, caller is preserved
    #[tokio::test]
    async fn test_batch_preserves_caller() {
        let harness = Harness::new();
        let governance = PeerSet::well_known().governance();

        let response = harness
            .send(
                subsystem_ids::CONSENSUS,
                governance,
                5,
                fixtures::multicall(vec![fixtures::set_epoch_length(10), fixtures::epoch_length()]),
            )
            .await;

        assert!(response.success);
        let results = Decoder::new(response.output.as_slice())
            .bytes_array(0)
            .unwrap();
        assert!(results[0].is_empty());
        assert_eq!(fixtures::decode_uint(&results[1]), Some(U256::from(10)));
    }

    /// Test: genesis can be done in one batched system transaction at height 1
    #[tokio::test]
    async fn test_batched_init() {
        let harness = Harness::new();
        let response = harness
            .produce(
                producer(),
                1,
                fixtures::multicall(vec![fixtures::init(), fixtures::reward(validator())]),
            )
            .await;

        assert!(response.success);
        assert!(read_initialized(&harness.storage).unwrap());
    }

    // =========================================================================
    // SECURITY
    // =========================================================================

    /// Test: requests from other subsystems never reach the contract
    #[tokio::test]
    async fn test_unauthorized_subsystem_cannot_init() {
        let harness = Harness::new();

        let result = harness
            .service
            .handle_invoke(
                6, // Mempool
                Uuid::new_v4(),
                InvokeRequestPayload {
                    caller: producer(),
                    calldata: fixtures::init(),
                    block_context: BlockContext::new(1, producer()),
                },
            )
            .await;

        assert!(matches!(result, Err(IpcError::UnauthorizedSender { .. })));
        assert!(!read_initialized(&harness.storage).unwrap());
    }
}
