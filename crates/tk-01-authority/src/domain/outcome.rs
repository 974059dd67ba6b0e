//! Result of looking a token up in the ledger.

use shared_types::ValidateTicketResponse;
use std::fmt;

/// Why a token was accepted or refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    Valid,
    Expired,
    NotFound,
}

impl ValidationReason {
    /// Short machine-friendly form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::Valid => "valid",
            ValidationReason::Expired => "expired",
            ValidationReason::NotFound => "not found",
        }
    }

    /// Human-readable message returned to callers.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ValidationReason::Valid => "Ticket is valid",
            ValidationReason::Expired => "Ticket expired",
            ValidationReason::NotFound => "Ticket not found in database",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`validate`](crate::TicketAuthorityApi::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub exists: bool,
    pub valid: bool,
    pub reason: ValidationReason,
    /// Id carried by the token.
    pub ticket_id: String,
    /// Line number from the ledger entry, or from the token when not found.
    pub line_number: i32,
}

impl ValidationOutcome {
    /// Wire form of the outcome.
    #[must_use]
    pub fn to_response(&self) -> ValidateTicketResponse {
        ValidateTicketResponse {
            success: true,
            valid: self.valid,
            message: self.reason.message().to_string(),
            ticket_id: self.ticket_id.clone(),
            line_number: self.line_number,
            exists: self.exists,
            reason: self.reason.as_str().to_string(),
        }
    }
}
