//! # Adapters Layer (Outer Hexagon)
//!
//! Adapters connect the System Contracts subsystem to external systems.
//!
//! ## Architecture Compliance (Architecture.md v2.3)
//!
//! - Adapters implement domain ports
//! - No direct subsystem-to-subsystem calls

pub mod state_adapter;

pub use state_adapter::*;
