//! # Integration Tests
//!
//! Cross-layer flows: event bus payloads through the service into a derived
//! system contract and its storage.

pub mod system_contract_flows;
