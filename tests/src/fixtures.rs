//! # Test Fixtures
//!
//! A small system contract built on the injector base, shared by the
//! integration flows and the benchmarks.
//!
//! | Field | Slot | Meaning |
//! |-------|------|---------|
//! | 0 | 100 | epoch length |
//! | 1 | 101 | mapping: validator => reward count |
//! | 2 | 102 | mapping: validator => slash count |

use qc_18_system_contracts::prelude::*;

/// `initialize(uint256)`: genesis epoch length, initializer only.
pub const INITIALIZE: &str = "initialize(uint256)";
/// `setEpochLength(uint256)`: governance only.
pub const SET_EPOCH_LENGTH: &str = "setEpochLength(uint256)";
/// `epochLength()`: anyone.
pub const EPOCH_LENGTH: &str = "epochLength()";
/// `reward(address)`: block producer or system reward.
pub const REWARD: &str = "reward(address)";
/// `slash(address)`: slashing indicator only.
pub const SLASH: &str = "slash(address)";
/// `rewards(address)`: anyone.
pub const REWARDS: &str = "rewards(address)";

const EPOCH_FIELD: u64 = 0;
const REWARDS_FIELD: u64 = 1;
const SLASHES_FIELD: u64 = 2;

/// Chain configuration contract used in tests.
pub struct ChainConfigContract {
    injector: InjectorContext,
}

impl ChainConfigContract {
    /// Deploys the contract at the well-known chain config address.
    pub fn new(storage: impl ContractStorage + 'static) -> Self {
        Self {
            injector: InjectorContext::new(
                PeerKind::ChainConfig.well_known_address(),
                PeerSet::well_known(),
                storage,
            ),
        }
    }

    fn bump(&mut self, field: u64, validator: Address) -> Result<U256, InjectorError> {
        let slot = self.injector.mapping_slot(field, &validator.as_bytes()[..]);
        let next = self.injector.load(&slot)?.to_u256() + U256::one();
        self.injector.store(slot, StorageValue::from_u256(next))?;
        Ok(next)
    }
}

fn uint(value: U256) -> Bytes {
    Bytes::from_vec(encode(&[Token::Uint(value)]))
}

/// Gate each operation declares; None for selectors this contract does not serve.
fn gate(sel: Selector) -> Option<Access> {
    let access = if sel == selector(INITIALIZE) {
        Access::Initializing
    } else if sel == selector(SET_EPOCH_LENGTH) {
        Access::Governance
    } else if sel == selector(REWARD) {
        Access::CoinbaseOrSystemReward
    } else if sel == selector(SLASH) {
        Access::SlashingIndicator
    } else if sel == selector(EPOCH_LENGTH) || sel == selector(REWARDS) {
        Access::Anyone
    } else {
        return None;
    };
    Some(access)
}

impl SystemContract for ChainConfigContract {
    fn injector(&self) -> &InjectorContext {
        &self.injector
    }

    fn injector_mut(&mut self) -> &mut InjectorContext {
        &mut self.injector
    }

    fn handle_call(
        &mut self,
        ctx: &ExecutionContext,
        sel: Selector,
        args: &[u8],
    ) -> Result<Option<Bytes>, InjectorError> {
        let Some(access) = gate(sel) else {
            return Ok(None);
        };
        access.check(&self.injector, ctx)?;
        let args = Decoder::new(args);

        let output = if sel == selector(INITIALIZE) {
            self.injector
                .store_field(EPOCH_FIELD, StorageValue::from_u256(args.uint(0)?))?;
            Bytes::new()
        } else if sel == selector(SET_EPOCH_LENGTH) {
            let length = args.uint(0)?;
            if length.is_zero() {
                return Err(InjectorError::reason("epoch length must be positive"));
            }
            self.injector
                .store_field(EPOCH_FIELD, StorageValue::from_u256(length))?;
            Bytes::new()
        } else if sel == selector(EPOCH_LENGTH) {
            uint(self.injector.load_field(EPOCH_FIELD)?.to_u256())
        } else if sel == selector(REWARD) {
            uint(self.bump(REWARDS_FIELD, args.address(0)?)?)
        } else if sel == selector(SLASH) {
            uint(self.bump(SLASHES_FIELD, args.address(0)?)?)
        } else {
            let slot = self
                .injector
                .mapping_slot(REWARDS_FIELD, &args.address(0)?.as_bytes()[..]);
            uint(self.injector.load(&slot)?.to_u256())
        };
        Ok(Some(output))
    }
}

// =============================================================================
// CALLDATA BUILDERS
// =============================================================================

/// `initialize(length)`.
#[must_use]
pub fn initialize(length: u64) -> Bytes {
    encode_call(selector(INITIALIZE), &[Token::Uint(U256::from(length))])
}

/// `setEpochLength(length)`.
#[must_use]
pub fn set_epoch_length(length: u64) -> Bytes {
    encode_call(selector(SET_EPOCH_LENGTH), &[Token::Uint(U256::from(length))])
}

/// `epochLength()`.
#[must_use]
pub fn epoch_length() -> Bytes {
    encode_call(selector(EPOCH_LENGTH), &[])
}

/// `reward(validator)`.
#[must_use]
pub fn reward(validator: Address) -> Bytes {
    encode_call(selector(REWARD), &[Token::Address(validator)])
}

/// `slash(validator)`.
#[must_use]
pub fn slash(validator: Address) -> Bytes {
    encode_call(selector(SLASH), &[Token::Address(validator)])
}

/// `rewards(validator)`.
#[must_use]
pub fn rewards(validator: Address) -> Bytes {
    encode_call(selector(REWARDS), &[Token::Address(validator)])
}

/// `useDelayedInitializer(payload)`.
#[must_use]
pub fn use_delayed_initializer(payload: &Bytes) -> Bytes {
    encode_call(
        selector(signatures::USE_DELAYED_INITIALIZER),
        &[Token::Bytes(payload.as_slice().to_vec())],
    )
}

/// `init()`.
#[must_use]
pub fn init() -> Bytes {
    encode_call(selector(signatures::INIT), &[])
}

/// `isInitialized()`.
#[must_use]
pub fn is_initialized() -> Bytes {
    encode_call(selector(signatures::IS_INITIALIZED), &[])
}

/// `multicall(items)`.
#[must_use]
pub fn multicall(items: Vec<Bytes>) -> Bytes {
    encode_call(selector(signatures::MULTICALL), &[Token::BytesArray(items)])
}

/// Decodes a single `uint256` output word.
#[must_use]
pub fn decode_uint(output: &Bytes) -> Option<U256> {
    Decoder::new(output.as_slice()).uint(0).ok()
}
