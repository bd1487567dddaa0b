//! # Configuration
//!
//! Genesis-time configuration of a system contract and its hosting service.

use crate::domain::peers::{PeerKind, PeerSet};
use crate::domain::value_objects::Address;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Addresses a system contract is constructed with.
///
/// Peers are listed in construction order and written as `0x`-prefixed hex.
///
/// ```json
/// {
///   "address": "0x0000000000000000000000000000000000001000",
///   "peers": {
///     "staking": "0x0000000000000000000000000000000000001000",
///     "slashing_indicator": "0x0000000000000000000000000000000000001001",
///     "system_reward": "0x0000000000000000000000000000000000001002",
///     "staking_pool": "0x0000000000000000000000000000000000007001",
///     "governance": "0x0000000000000000000000000000000000007002",
///     "chain_config": "0x0000000000000000000000000000000000007003",
///     "runtime_upgrade": "0x0000000000000000000000000000000000007004",
///     "deployer_proxy": "0x0000000000000000000000000000000000007005"
///   }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Address of the contract itself.
    pub address: String,
    /// Peer addresses.
    pub peers: PeerAddresses,
}

/// Peer addresses in construction order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerAddresses {
    /// Staking.
    pub staking: String,
    /// Slashing indicator.
    pub slashing_indicator: String,
    /// System reward.
    pub system_reward: String,
    /// Staking pool.
    pub staking_pool: String,
    /// Governance.
    pub governance: String,
    /// Chain config.
    pub chain_config: String,
    /// Runtime upgrade.
    pub runtime_upgrade: String,
    /// Deployer proxy.
    pub deployer_proxy: String,
}

impl InjectorConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config for the contract at `address` with the well-known peers.
    #[must_use]
    pub fn well_known(address: Address) -> Self {
        let peers = PeerSet::well_known();
        let hex = |kind| format!("{:?}", peers.get(kind));
        Self {
            address: format!("{address:?}"),
            peers: PeerAddresses {
                staking: hex(PeerKind::Staking),
                slashing_indicator: hex(PeerKind::SlashingIndicator),
                system_reward: hex(PeerKind::SystemReward),
                staking_pool: hex(PeerKind::StakingPool),
                governance: hex(PeerKind::Governance),
                chain_config: hex(PeerKind::ChainConfig),
                runtime_upgrade: hex(PeerKind::RuntimeUpgrade),
                deployer_proxy: hex(PeerKind::DeployerProxy),
            },
        }
    }

    /// The contract's own address.
    pub fn contract_address(&self) -> Result<Address, ConfigError> {
        parse_address("address", &self.address)
    }

    /// Validated peer set.
    pub fn peer_set(&self) -> Result<PeerSet, ConfigError> {
        let p = &self.peers;
        PeerSet::new(
            parse_address("staking", &p.staking)?,
            parse_address("slashing_indicator", &p.slashing_indicator)?,
            parse_address("system_reward", &p.system_reward)?,
            parse_address("staking_pool", &p.staking_pool)?,
            parse_address("governance", &p.governance)?,
            parse_address("chain_config", &p.chain_config)?,
            parse_address("runtime_upgrade", &p.runtime_upgrade)?,
            parse_address("deployer_proxy", &p.deployer_proxy)?,
        )
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    value.parse().map_err(|source| ConfigError::InvalidAddress {
        field: field.to_string(),
        source,
    })
}

/// System Contracts service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Emit a debug event per committed log.
    pub enable_tracing: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enable_tracing: false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
