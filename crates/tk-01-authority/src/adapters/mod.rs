//! # Adapters
//!
//! - `csv_store`: ledger persisted as a delimited text file
//! - `memory`: ledger kept in memory (tests)
//! - `faults`: fault injectors for the validate endpoint

pub mod csv_store;
pub mod faults;
pub mod memory;

pub use csv_store::{CsvLedgerStore, LEDGER_HEADER};
pub use faults::{AlwaysFail, FailEveryNth, FaultInjectionConfig, NoFaults, RandomFaults};
pub use memory::InMemoryLedgerStore;
