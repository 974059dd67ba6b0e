//! # Ticket Ledger
//!
//! In-memory image of every issued ticket plus the issuance sequence.
//!
//! ## Invariants
//!
//! - Ids are unique; the first occurrence of an id wins on load.
//! - `sequence` is never below the largest sequence number embedded in a
//!   stored id, so a fresh id never collides with one issued before a restart.
//! - Entries are never mutated or deleted, except that an entry whose
//!   persistence failed is rolled back before anyone else can observe it.

use chrono::{DateTime, Utc};
use shared_types::Ticket;
use std::collections::HashMap;
use tracing::warn;

/// Prefix of every id the authority generates.
pub const TICKET_ID_PREFIX: &str = "TKT";

/// Extract the sequence number from an id of the form `TKT-<seq>-<millis>`.
///
/// The sequence is the integer between the first and second `-`. Ids that
/// do not follow the pattern yield `None` and do not move the counter.
#[must_use]
pub fn sequence_of(id: &str) -> Option<u64> {
    let mut parts = id.split('-');
    parts.next()?;
    parts.next()?.parse().ok()
}

/// Issued tickets in issuance order, indexed by id.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<Ticket>,
    index: HashMap<String, usize>,
    sequence: u64,
}

impl Ledger {
    /// Build a ledger from loaded rows.
    ///
    /// Duplicate ids are skipped with a warning; the counter starts at the
    /// largest embedded sequence number.
    #[must_use]
    pub fn from_entries(tickets: Vec<Ticket>) -> Self {
        let mut ledger = Self::default();
        for ticket in tickets {
            if ledger.index.contains_key(&ticket.id) {
                warn!(ticket_id = %ticket.id, "[tk-01] Duplicate ledger row skipped");
                continue;
            }
            if let Some(seq) = sequence_of(&ticket.id) {
                ledger.sequence = ledger.sequence.max(seq);
            }
            ledger.push(ticket);
        }
        ledger
    }

    /// Allocate the next id: `TKT-<seq>-<unix millis>`.
    ///
    /// The counter only moves forward, even if the issuance using the id is
    /// later rolled back. Returns `None` once the counter is exhausted; it
    /// never wraps back to ids that may already exist.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> Option<String> {
        self.sequence = self.sequence.checked_add(1)?;
        Some(format!(
            "{}-{}-{}",
            TICKET_ID_PREFIX,
            self.sequence,
            now.timestamp_millis()
        ))
    }

    /// Append a newly issued ticket.
    ///
    /// Returns `false` (and leaves the ledger untouched) if the id exists.
    pub fn insert(&mut self, ticket: Ticket) -> bool {
        if self.index.contains_key(&ticket.id) {
            return false;
        }
        self.push(ticket);
        true
    }

    /// Undo the most recent [`insert`](Self::insert) of `id`.
    pub fn rollback(&mut self, id: &str) {
        if self.entries.last().map(|t| t.id.as_str()) == Some(id) {
            self.entries.pop();
            self.index.remove(id);
        }
    }

    /// Look up a ticket by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// All tickets in issuance order.
    #[must_use]
    pub fn entries(&self) -> &[Ticket] {
        &self.entries
    }

    /// Current value of the issuance counter.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, ticket: Ticket) {
        self.index.insert(ticket.id.clone(), self.entries.len());
        self.entries.push(ticket);
    }
}
