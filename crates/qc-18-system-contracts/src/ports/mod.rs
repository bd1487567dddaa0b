//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for system contract execution.
//! These are the interfaces between the domain and the outside world.
//!
//! ## Architecture Compliance (Architecture.md v2.3)
//!
//! - **Driving Ports (Inbound)**: `SystemContract`, `InjectorApi`, `SystemContractApi`
//! - **Driven Ports (Outbound)**: `ContractStorage`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
