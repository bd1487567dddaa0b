//! # Peer Registry
//!
//! The fixed, closed set of peer subsystems a system contract references.
//! Bound once at construction into a fixed-slot table indexed by [`PeerKind`];
//! there is no setter, so a peer's identity is constant for the lifetime of the
//! unit that holds it.

use crate::domain::value_objects::Address;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of peer subsystems.
pub const PEER_COUNT: usize = 8;

/// Peer subsystem kinds, in construction order.
///
/// The discriminants are table indices and part of the construction contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PeerKind {
    /// Validator staking.
    Staking = 0,
    /// Slashing indicator (reports misbehaving producers).
    SlashingIndicator = 1,
    /// System reward pool.
    SystemReward = 2,
    /// Delegated staking pool.
    StakingPool = 3,
    /// On-chain governance.
    Governance = 4,
    /// Chain configuration parameters.
    ChainConfig = 5,
    /// Runtime (system contract) upgrades.
    RuntimeUpgrade = 6,
    /// Contract deployer registry.
    DeployerProxy = 7,
}

impl PeerKind {
    /// All kinds in construction order.
    pub const ALL: [Self; PEER_COUNT] = [
        Self::Staking,
        Self::SlashingIndicator,
        Self::SystemReward,
        Self::StakingPool,
        Self::Governance,
        Self::ChainConfig,
        Self::RuntimeUpgrade,
        Self::DeployerProxy,
    ];

    /// Table index of this kind.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Staking => "Staking",
            Self::SlashingIndicator => "SlashingIndicator",
            Self::SystemReward => "SystemReward",
            Self::StakingPool => "StakingPool",
            Self::Governance => "Governance",
            Self::ChainConfig => "ChainConfig",
            Self::RuntimeUpgrade => "RuntimeUpgrade",
            Self::DeployerProxy => "DeployerProxy",
        }
    }

    /// Well-known genesis address of this peer.
    #[must_use]
    pub const fn well_known_address(self) -> Address {
        let low = match self {
            Self::Staking => 0x1000,
            Self::SlashingIndicator => 0x1001,
            Self::SystemReward => 0x1002,
            Self::StakingPool => 0x7001,
            Self::Governance => 0x7002,
            Self::ChainConfig => 0x7003,
            Self::RuntimeUpgrade => 0x7004,
            Self::DeployerProxy => 0x7005,
        };
        Address::from_low_u64(low)
    }
}

impl fmt::Display for PeerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable references to the eight peer subsystems.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerSet {
    slots: [Address; PEER_COUNT],
}

impl PeerSet {
    /// Binds the peers in construction order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NullPeer`] for the first zero address.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        staking: Address,
        slashing_indicator: Address,
        system_reward: Address,
        staking_pool: Address,
        governance: Address,
        chain_config: Address,
        runtime_upgrade: Address,
        deployer_proxy: Address,
    ) -> Result<Self, ConfigError> {
        Self::from_array([
            staking,
            slashing_indicator,
            system_reward,
            staking_pool,
            governance,
            chain_config,
            runtime_upgrade,
            deployer_proxy,
        ])
    }

    /// Binds the peers from an array in construction order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NullPeer`] for the first zero address.
    pub fn from_array(slots: [Address; PEER_COUNT]) -> Result<Self, ConfigError> {
        if let Some(kind) = PeerKind::ALL.into_iter().find(|k| slots[k.index()].is_zero()) {
            return Err(ConfigError::NullPeer(kind));
        }
        Ok(Self { slots })
    }

    /// The BSC-compatible genesis addresses.
    #[must_use]
    pub fn well_known() -> Self {
        Self {
            slots: PeerKind::ALL.map(PeerKind::well_known_address),
        }
    }

    /// Address of the given peer.
    #[must_use]
    pub const fn get(&self, kind: PeerKind) -> Address {
        self.slots[kind.index()]
    }

    /// Staking peer.
    #[must_use]
    pub const fn staking(&self) -> Address {
        self.get(PeerKind::Staking)
    }

    /// Slashing indicator peer.
    #[must_use]
    pub const fn slashing_indicator(&self) -> Address {
        self.get(PeerKind::SlashingIndicator)
    }

    /// System reward peer.
    #[must_use]
    pub const fn system_reward(&self) -> Address {
        self.get(PeerKind::SystemReward)
    }

    /// Staking pool peer.
    #[must_use]
    pub const fn staking_pool(&self) -> Address {
        self.get(PeerKind::StakingPool)
    }

    /// Governance peer.
    #[must_use]
    pub const fn governance(&self) -> Address {
        self.get(PeerKind::Governance)
    }

    /// Chain config peer.
    #[must_use]
    pub const fn chain_config(&self) -> Address {
        self.get(PeerKind::ChainConfig)
    }

    /// Runtime upgrade peer.
    #[must_use]
    pub const fn runtime_upgrade(&self) -> Address {
        self.get(PeerKind::RuntimeUpgrade)
    }

    /// Deployer proxy peer.
    #[must_use]
    pub const fn deployer_proxy(&self) -> Address {
        self.get(PeerKind::DeployerProxy)
    }

    /// Returns the kind bound to `address`, if any.
    #[must_use]
    pub fn kind_of(&self, address: Address) -> Option<PeerKind> {
        self.iter().find(|(_, a)| *a == address).map(|(k, _)| k)
    }

    /// Iterates `(kind, address)` in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (PeerKind, Address)> + '_ {
        PeerKind::ALL.into_iter().map(|k| (k, self.get(k)))
    }
}

impl fmt::Debug for PeerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, address) in self.iter() {
            map.entry(&kind.name(), &address);
        }
        map.finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
