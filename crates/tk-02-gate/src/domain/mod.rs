//! # Domain Layer
//!
//! Verdicts, bounded history, statistics and report snapshots.

pub mod errors;
pub mod history;
pub mod report;
pub mod verdict;

pub use errors::{GateError, UpstreamError};
pub use history::{ValidationHistory, ValidationRecord, DEFAULT_HISTORY_CAPACITY};
pub use report::{GateReport, GateStats, ReportFormat};
pub use verdict::{
    GateVerdict, OnlineVerdict, OFFLINE_EXPIRED_MESSAGE, OFFLINE_INVALID_MESSAGE,
    OFFLINE_VALID_MESSAGE,
};
