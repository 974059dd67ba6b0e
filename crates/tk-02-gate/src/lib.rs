//! # Gate Validator (tk-02)
//!
//! Resolves validation requests to admit/deny decisions while the authority
//! may be unreachable.
//!
//! ## Architecture
//!
//! ```text
//!  bus ──request──→ GateRunner ──→ GateValidator ──online──→ AuthorityClient (HTTP)
//!                                      │    └─fallback─→ Ticket::is_valid (expiry only)
//!                                      │
//!                                      ├──→ ValidationHistory (last 100) + GateStats
//!                                      ├──verdict──→ bus (ticket/validation/response)
//!                                      └──every Nth──→ GateReport ──→ authority (spawned)
//! ```
//!
//! ## Offline Mode
//!
//! The offline check trusts the dates carried by the token. A ticket that
//! was never issued but carries a plausible date is admitted offline; this
//! is accepted behavior.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod runner;
pub mod service;

pub use adapters::HttpAuthorityClient;
pub use config::{ConfigError, GateConfig};
pub use domain::{
    GateError, GateReport, GateStats, GateVerdict, OnlineVerdict, ReportFormat, UpstreamError,
    ValidationHistory, ValidationRecord,
};
pub use ports::{AuthorityClient, GateValidatorApi};
pub use runner::GateRunner;
pub use service::GateValidator;
