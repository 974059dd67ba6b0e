//! Verdicts and the offline check.

use chrono::{DateTime, Utc};
use shared_types::{Ticket, ValidationMode};

pub const OFFLINE_VALID_MESSAGE: &str = "Valid (offline check - expiry only)";
pub const OFFLINE_EXPIRED_MESSAGE: &str = "Expired (offline check)";
pub const OFFLINE_INVALID_MESSAGE: &str = "Invalid (offline check)";

/// The authority's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineVerdict {
    pub valid: bool,
    pub message: String,
}

/// Admit/deny decision and which check produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateVerdict {
    pub valid: bool,
    pub mode: ValidationMode,
    pub message: String,
}

impl GateVerdict {
    /// Take the authority's verdict as is.
    #[must_use]
    pub fn online(verdict: OnlineVerdict) -> Self {
        Self {
            valid: verdict.valid,
            mode: ValidationMode::Online,
            message: verdict.message,
        }
    }

    /// Expiry-only check of the ticket as carried by the token.
    ///
    /// No ledger is consulted, so a never-issued ticket with a plausible
    /// date passes.
    #[must_use]
    pub fn offline(ticket: &Ticket, now: DateTime<Utc>) -> Self {
        let valid = ticket.is_valid(now);
        let message = if valid {
            OFFLINE_VALID_MESSAGE
        } else if ticket.id.is_empty() || ticket.validity_days <= 0 {
            OFFLINE_INVALID_MESSAGE
        } else {
            OFFLINE_EXPIRED_MESSAGE
        };
        Self {
            valid,
            mode: ValidationMode::Offline,
            message: message.to_string(),
        }
    }
}
