//! # Ticket Token Codec
//!
//! Converts between [`Ticket`] and the opaque text token used on the bus and
//! in REST bodies.
//!
//! ```text
//! Ticket ──fixed key order──→ canonical JSON ──base64 (STANDARD, padded)──→ token
//! token  ──base64 decode──→ JSON bytes ──serde_json (by field name)──→ Ticket
//! ```
//!
//! The encoding is reversible, not tamper-proof.

use crate::ticket::Ticket;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

/// A token that could not be turned back into a ticket.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedTokenError {
    /// The text is not valid padded standard base64.
    #[error("Token is not valid base64: {0}")]
    Base64(String),

    /// The decoded bytes are not a ticket document (bad JSON or missing fields).
    #[error("Token does not contain a ticket: {0}")]
    Structure(String),
}

/// Canonical JSON form of a ticket.
///
/// Keys are written in a fixed order and strings are escaped through
/// [`serde_json::Value`]'s `Display`, so equal tickets always yield
/// byte-identical output and the conversion cannot fail. The result matches
/// `serde_json::to_string` of the [`Ticket`] derive.
#[must_use]
pub fn to_canonical_json(ticket: &Ticket) -> String {
    format!(
        r#"{{"ticketId":{},"creationDate":{},"validityDays":{},"lineNumber":{}}}"#,
        Value::from(ticket.id.as_str()),
        Value::from(ticket.issued_at.as_str()),
        ticket.validity_days,
        ticket.line_number,
    )
}

/// Parse the canonical JSON form. All four fields are required.
pub fn from_canonical_json(json: &[u8]) -> Result<Ticket, MalformedTokenError> {
    serde_json::from_slice(json).map_err(|e| MalformedTokenError::Structure(e.to_string()))
}

/// Encode a ticket as a padded standard-base64 token.
#[must_use]
pub fn encode(ticket: &Ticket) -> String {
    STANDARD.encode(to_canonical_json(ticket))
}

/// Decode a base64 token back into a ticket.
///
/// # Errors
///
/// - [`MalformedTokenError::Base64`] if the text transform fails
/// - [`MalformedTokenError::Structure`] if the JSON is invalid or a required
///   field is missing; defaults are never substituted
pub fn decode(token: &str) -> Result<Ticket, MalformedTokenError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| MalformedTokenError::Base64(e.to_string()))?;
    from_canonical_json(&bytes)
}
