//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the authority requires from its host.

use crate::domain::LedgerStoreError;
use shared_types::Ticket;

/// Rows recovered from durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedLedger {
    pub tickets: Vec<Ticket>,
    /// Rows that could not be parsed and were dropped.
    pub skipped_rows: usize,
}

/// Durable ledger storage.
///
/// Production: `CsvLedgerStore`
/// Testing: `InMemoryLedgerStore`
pub trait LedgerStore: Send {
    /// Read every parsable row. A missing ledger is an empty ledger.
    fn load(&self) -> Result<LoadedLedger, LedgerStoreError>;

    /// Replace the stored ledger with `tickets`.
    ///
    /// Either the whole ledger is written or the previous one is left intact.
    fn persist(&mut self, tickets: &[Ticket]) -> Result<(), LedgerStoreError>;
}

/// Hook consulted by the validate endpoint before doing any work.
///
/// Used only to exercise the gates' offline fallback.
pub trait FaultInjector: Send + Sync {
    /// Whether this request should fail.
    fn should_fail(&self) -> bool;
}
