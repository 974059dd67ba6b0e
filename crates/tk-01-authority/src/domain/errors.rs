//! # Domain Errors
//!
//! Error types for the Ticket Authority.
//!
//! | Error | Caller sees |
//! |-------|-------------|
//! | `MalformedInput` | 400 (500 on the validate route) |
//! | `MalformedToken` | 500 (only raised by validate) |
//! | `Persistence` | 500, in-memory ledger rolled back |
//! | `InjectedFault` | 500 |
//! | `Internal` | 500 |

use shared_types::MalformedTokenError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the authority service and its REST handlers.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// Request body has the wrong shape.
    #[error("Malformed request: {0}")]
    MalformedInput(String),

    /// The ticket token could not be decoded.
    #[error("Malformed ticket token: {0}")]
    MalformedToken(#[from] MalformedTokenError),

    /// The ledger could not be written; nothing was issued.
    #[error("Ledger persistence failed: {0}")]
    Persistence(#[from] LedgerStoreError),

    /// A configured fault fired (fallback-path testing).
    #[error("Simulated validation service failure")]
    InjectedFault,

    /// Unexpected failure (e.g. a worker task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthorityError {
    /// Whether the caller is at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthorityError::MalformedInput(_) | AuthorityError::MalformedToken(_)
        )
    }
}

/// Errors from a ledger store adapter.
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store refused the write (test adapters).
    #[error("Write rejected: {0}")]
    Rejected(String),
}
