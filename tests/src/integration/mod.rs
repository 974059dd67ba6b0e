//! Cross-crate scenarios.

pub mod gate_flows;
pub mod issuance;
