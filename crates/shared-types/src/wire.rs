//! # Wire Payloads
//!
//! JSON bodies of the authority's REST surface and the bus topics.
//!
//! | Payload | Where |
//! |---------|-------|
//! | `CreateTicketRequest` / `CreateTicketResponse` | `POST /api/tickets/create` |
//! | `ValidationRequest` / `ValidateTicketResponse` | `POST /api/tickets/validate`, `ticket/validation/request[/<gateId>]` |
//! | `ReportAck` | `POST /api/reports` |
//! | `ValidationResponse` | `ticket/validation/response` |
//! | `ErrorResponse` | any failed REST call |

use crate::ticket::Ticket;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /api/tickets/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub validity_days: i32,
    pub line_number: i32,
}

/// Successful answer to a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketResponse {
    pub success: bool,
    pub ticket_id: String,
    pub ticket: Ticket,
    pub ticket_base64: String,
}

/// A ticket token to validate, both over REST and on the request topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub ticket_base64: String,
}

/// The authority's verdict on a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTicketResponse {
    pub success: bool,
    pub valid: bool,
    /// Human-readable description of the outcome.
    pub message: String,
    pub ticket_id: String,
    pub line_number: i32,
    /// Whether the id is present in the ledger.
    #[serde(default)]
    pub exists: bool,
    /// Short machine-friendly reason: `valid`, `expired` or `not found`.
    #[serde(default)]
    pub reason: String,
}

/// Acknowledgement of `POST /api/reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAck {
    pub success: bool,
    pub message: String,
}

/// Body of every failed REST call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Which check produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Authority-backed.
    Online,
    /// Local expiry-only check.
    Offline,
}

impl ValidationMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::Online => "online",
            ValidationMode::Offline => "offline",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical gate action, a pure function of the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateAction {
    Open,
    Closed,
}

impl GateAction {
    /// `valid → OPEN`, otherwise `CLOSED`.
    #[must_use]
    pub fn for_verdict(valid: bool) -> Self {
        if valid {
            GateAction::Open
        } else {
            GateAction::Closed
        }
    }
}

/// Verdict published on `ticket/validation/response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub gate_id: String,
    pub ticket_id: String,
    pub valid: bool,
    pub gate_action: GateAction,
    pub validation_mode: ValidationMode,
    pub message: String,
}
