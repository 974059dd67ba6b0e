//! # Ticket Authority (tk-01)
//!
//! The single source of truth for which tickets exist.
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────────────── api (axum) ────────────────────────┐
//!  REST  ──→ │ /api/tickets/create  /api/tickets/validate  /api/reports   │
//!            └──────────────┬──────────────────────────────┬──────────────┘
//!                           ↓                              ↓
//!                ┌─────────────────────┐          ┌────────────────┐
//!                │  TicketAuthority    │          │   ReportLog    │
//!                │  Mutex<Ledger+Store>│          │ (own lock)     │
//!                └──────────┬──────────┘          └────────────────┘
//!                           ↓
//!                 LedgerStore (CSV file / memory)
//! ```
//!
//! ## Guarantees
//!
//! - Ids are `TKT-<sequence>-<unix millis>`; the sequence survives restarts.
//! - An issued ticket is durable before it is returned.
//! - Validation judges the ledger entry, not the token's copy of it.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{
    AlwaysFail, CsvLedgerStore, FailEveryNth, FaultInjectionConfig, InMemoryLedgerStore, NoFaults,
    RandomFaults,
};
pub use api::{router, serve, AppState};
pub use config::{AuthorityConfig, ConfigError};
pub use domain::{
    AuthorityError, LedgerStoreError, ReportEntry, ReportLog, ValidationOutcome, ValidationReason,
};
pub use ports::{FaultInjector, IssuedTicket, LedgerStore, LoadedLedger, TicketAuthorityApi};
pub use service::TicketAuthority;
