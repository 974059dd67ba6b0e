//! # Domain Layer
//!
//! Ledger state, validation outcomes, the report log and error types.
//! Pure logic; persistence goes through the ports.

pub mod errors;
pub mod ledger;
pub mod outcome;
pub mod reports;

pub use errors::{AuthorityError, LedgerStoreError};
pub use ledger::{sequence_of, Ledger, TICKET_ID_PREFIX};
pub use outcome::{ValidationOutcome, ValidationReason};
pub use reports::{ReportEntry, ReportLog};
