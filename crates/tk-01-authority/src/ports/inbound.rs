//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the Ticket Authority.

use crate::domain::{AuthorityError, ReportEntry, ValidationOutcome};
use shared_types::Ticket;

/// A freshly issued ticket and its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTicket {
    pub ticket: Ticket,
    pub token: String,
}

/// Operations offered by the authority.
///
/// Implementations serialize every ledger read and write through one lock,
/// so concurrent callers never observe a half-applied issuance.
pub trait TicketAuthorityApi: Send + Sync {
    /// Issue a ticket valid for `validity_days` from now.
    ///
    /// ## Atomicity
    ///
    /// The ticket is returned only after the full ledger has been persisted.
    /// On persistence failure the in-memory ledger is rolled back.
    ///
    /// ## Errors
    ///
    /// - `Persistence`: the ledger could not be written
    fn issue(&self, validity_days: i32, line_number: i32) -> Result<IssuedTicket, AuthorityError>;

    /// Check a token against the ledger.
    ///
    /// Only the token's id is used for lookup; expiry is computed from the
    /// stored entry.
    ///
    /// ## Errors
    ///
    /// - `MalformedToken`: the token does not decode
    fn validate(&self, token: &str) -> Result<ValidationOutcome, AuthorityError>;

    /// Append an opaque report to the report log.
    ///
    /// ## Errors
    ///
    /// - `MalformedInput`: the report is empty
    fn record_report(&self, body: String) -> Result<(), AuthorityError>;

    /// Every ledger entry in issuance order.
    fn tickets(&self) -> Vec<Ticket>;

    /// Every stored report, oldest first.
    fn reports(&self) -> Vec<ReportEntry>;
}
