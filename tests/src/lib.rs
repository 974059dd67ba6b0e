//! # Ticketing Test Suite
//!
//! Cross-crate tests: a real authority server on an ephemeral port, gates
//! driven through the in-memory bus.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Authority server + gate fixtures
//! └── integration/
//!     ├── issuance.rs   # REST issuance, ledger durability, restart
//!     └── gate_flows.rs # Online, offline fallback, reports
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tk-tests
//! cargo test -p tk-tests integration::gate_flows
//! ```

pub mod harness;
pub mod integration;
