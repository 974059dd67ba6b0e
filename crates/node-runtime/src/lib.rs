//! # Ticket Node Runtime
//!
//! Process bootstrap for the ticketing services.
//!
//! ## Modes
//!
//! - `authority` - the Ticket Authority REST server
//! - `gate` - one Gate Validator consuming from the bus
//! - `node` - authority, gates and the in-memory bus in one process, with
//!   requests read from stdin
//!
//! ## Shutdown
//!
//! Every long-running task watches a shared `watch::Receiver<bool>`; Ctrl+C
//! flips it and the tasks drain.

pub mod config;
pub mod driver;
pub mod runtime;

pub use config::NodeConfig;
pub use runtime::{build_gate, spawn_gate, start_authority};
