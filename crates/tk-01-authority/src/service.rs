//! # Ticket Authority Service
//!
//! Owns the ledger and implements [`TicketAuthorityApi`].
//!
//! ## Locking
//!
//! The ledger, the issuance counter and the store sit behind one mutex.
//! Issuance (allocate id, append, persist) and validation lookups all take
//! it, so ids are unique under concurrent callers and no reader ever sees a
//! ticket that is not yet durable. The report log has its own lock.

use crate::domain::{
    AuthorityError, Ledger, ReportEntry, ReportLog, ValidationOutcome, ValidationReason,
};
use crate::ports::inbound::{IssuedTicket, TicketAuthorityApi};
use crate::ports::outbound::LedgerStore;
use parking_lot::Mutex;
use shared_types::{decode, encode, SystemTimeSource, Ticket, TimeSource};
use tracing::{debug, error, info};

struct LedgerState<S> {
    ledger: Ledger,
    store: S,
}

/// The Ticket Authority.
pub struct TicketAuthority<S: LedgerStore, T: TimeSource = SystemTimeSource> {
    state: Mutex<LedgerState<S>>,
    reports: ReportLog,
    time: T,
}

impl<S: LedgerStore> TicketAuthority<S, SystemTimeSource> {
    /// Load the ledger from `store` and start issuing on the system clock.
    pub fn open(store: S) -> Result<Self, AuthorityError> {
        Self::open_with_time(store, SystemTimeSource)
    }
}

impl<S: LedgerStore, T: TimeSource> TicketAuthority<S, T> {
    /// Load the ledger from `store` using `time` as the clock.
    ///
    /// Unparsable rows are skipped by the store; an unreadable ledger is an
    /// error.
    pub fn open_with_time(store: S, time: T) -> Result<Self, AuthorityError> {
        let loaded = store.load()?;
        let ledger = Ledger::from_entries(loaded.tickets);
        info!(
            tickets = ledger.len(),
            skipped = loaded.skipped_rows,
            sequence = ledger.sequence(),
            "[tk-01] Ledger loaded"
        );

        Ok(Self {
            state: Mutex::new(LedgerState { ledger, store }),
            reports: ReportLog::new(),
            time,
        })
    }

    /// Replace the report log (e.g. with a file-mirrored one).
    #[must_use]
    pub fn with_report_log(mut self, reports: ReportLog) -> Self {
        self.reports = reports;
        self
    }

    /// Number of tickets in the ledger.
    pub fn ticket_count(&self) -> usize {
        self.state.lock().ledger.len()
    }
}

impl<S: LedgerStore, T: TimeSource> TicketAuthorityApi for TicketAuthority<S, T> {
    fn issue(&self, validity_days: i32, line_number: i32) -> Result<IssuedTicket, AuthorityError> {
        let now = self.time.now();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let Some(id) = state.ledger.next_id(now) else {
            error!(
                sequence = state.ledger.sequence(),
                "[tk-01] Ticket sequence exhausted, refusing to issue"
            );
            return Err(AuthorityError::Internal(
                "ticket sequence exhausted".to_string(),
            ));
        };
        let ticket = Ticket::new(id.clone(), now, validity_days, line_number);
        if !state.ledger.insert(ticket.clone()) {
            return Err(AuthorityError::Internal(format!("ticket id {id} already in use")));
        }

        if let Err(e) = state.store.persist(state.ledger.entries()) {
            state.ledger.rollback(&id);
            error!(ticket_id = %id, error = %e, "[tk-01] Ledger write failed, issuance rolled back");
            return Err(e.into());
        }
        drop(guard);

        info!(
            ticket_id = %ticket.id,
            validity_days,
            line_number,
            "[tk-01] Ticket issued"
        );
        let token = encode(&ticket);
        Ok(IssuedTicket { ticket, token })
    }

    fn validate(&self, token: &str) -> Result<ValidationOutcome, AuthorityError> {
        let presented = decode(token)?;
        let now = self.time.now();

        let state = self.state.lock();
        let outcome = match state.ledger.get(&presented.id) {
            None => ValidationOutcome {
                exists: false,
                valid: false,
                reason: ValidationReason::NotFound,
                ticket_id: presented.id,
                line_number: presented.line_number,
            },
            Some(stored) => {
                let valid = stored.validity_days > 0 && !stored.is_expired(now);
                ValidationOutcome {
                    exists: true,
                    valid,
                    reason: if valid {
                        ValidationReason::Valid
                    } else {
                        ValidationReason::Expired
                    },
                    ticket_id: stored.id.clone(),
                    line_number: stored.line_number,
                }
            }
        };
        drop(state);

        debug!(
            ticket_id = %outcome.ticket_id,
            reason = %outcome.reason,
            "[tk-01] Ticket validated"
        );
        Ok(outcome)
    }

    fn record_report(&self, body: String) -> Result<(), AuthorityError> {
        if body.trim().is_empty() {
            return Err(AuthorityError::MalformedInput("report body is empty".into()));
        }
        self.reports.append(self.time.now(), body);
        Ok(())
    }

    fn tickets(&self) -> Vec<Ticket> {
        self.state.lock().ledger.entries().to_vec()
    }

    fn reports(&self) -> Vec<ReportEntry> {
        self.reports.entries()
    }
}
