//! # Ports Layer
//!
//! - `inbound`: the API the authority offers to its REST surface
//! - `outbound`: ledger persistence and the fault-injection hook

pub mod inbound;
pub mod outbound;

pub use inbound::{IssuedTicket, TicketAuthorityApi};
pub use outbound::{FaultInjector, LedgerStore, LoadedLedger};
