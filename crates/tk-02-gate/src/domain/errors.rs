//! # Domain Errors
//!
//! | Error | Effect |
//! |-------|--------|
//! | `GateError::MalformedInput` | request dropped, no verdict |
//! | `GateError::MalformedToken` | request dropped, no verdict |
//! | `UpstreamError` | not surfaced; routes the request offline |

use shared_types::MalformedTokenError;
use thiserror::Error;

/// Reasons a request is aborted without a verdict.
///
/// Distinct from an invalid ticket, which still yields a `CLOSED` verdict.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The bus payload is not a validation request.
    #[error("Malformed validation request: {0}")]
    MalformedInput(String),

    /// The token does not decode to a ticket.
    #[error("Malformed ticket token: {0}")]
    MalformedToken(#[from] MalformedTokenError),
}

/// Failures talking to the authority.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Connection refused, reset, DNS failure, etc.
    #[error("Authority unreachable: {0}")]
    Connect(String),

    /// No answer within the configured timeout.
    #[error("Authority did not answer in time")]
    Timeout,

    /// Answered with a non-success status.
    #[error("Authority returned HTTP {0}")]
    Status(u16),

    /// Answered 200 with a body that is not a successful response.
    #[error("Unusable authority response: {0}")]
    Body(String),
}
