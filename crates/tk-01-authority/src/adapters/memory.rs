use crate::domain::LedgerStoreError;
use crate::ports::outbound::{LedgerStore, LoadedLedger};
use parking_lot::Mutex;
use shared_types::Ticket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory ledger store for tests and ephemeral runs.
///
/// Clones share the same rows and the same failure switch, so a test can keep
/// a handle after moving the store into the authority.
#[derive(Clone, Default)]
pub struct InMemoryLedgerStore {
    rows: Arc<Mutex<Vec<Ticket>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `tickets`.
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(tickets)),
            fail_writes: Arc::default(),
        }
    }

    /// Make every subsequent `persist` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// What a reload would see.
    pub fn persisted(&self) -> Vec<Ticket> {
        self.rows.lock().clone()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<LoadedLedger, LedgerStoreError> {
        Ok(LoadedLedger {
            tickets: self.rows.lock().clone(),
            skipped_rows: 0,
        })
    }

    fn persist(&mut self, tickets: &[Ticket]) -> Result<(), LedgerStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerStoreError::Rejected("write failure injected".into()));
        }
        *self.rows.lock() = tickets.to_vec();
        Ok(())
    }
}
