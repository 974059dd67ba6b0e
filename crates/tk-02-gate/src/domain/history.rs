//! # Validation History
//!
//! Bounded ring of the most recent validations. When full, the oldest
//! record is evicted first. Never persisted.

use serde::Serialize;
use shared_types::{TicketTimestamp, ValidationMode};
use std::collections::VecDeque;

/// Default bound on stored records.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// One processed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecord {
    pub ticket_id: String,
    pub timestamp: TicketTimestamp,
    pub valid: bool,
    pub mode: ValidationMode,
}

/// FIFO ring of [`ValidationRecord`]s.
#[derive(Debug, Clone)]
pub struct ValidationHistory {
    records: VecDeque<ValidationRecord>,
    capacity: usize,
}

impl ValidationHistory {
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a record, evicting the oldest beyond capacity.
    pub fn push(&mut self, record: ValidationRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Up to `n` most recent records, newest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<ValidationRecord> {
        self.records.iter().rev().take(n).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ValidationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
