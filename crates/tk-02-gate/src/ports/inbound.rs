//! # Inbound Ports (Driving Ports)
//!
//! What the consumption loop drives.

use crate::domain::{GateError, GateReport, GateStats};
use async_trait::async_trait;
use shared_types::ValidationResponse;

/// Primary API of a gate.
#[async_trait]
pub trait GateValidatorApi: Send + Sync {
    /// Run one validation request through the gate, start to finish.
    ///
    /// Decode, online check, offline fallback, record, publish, and every
    /// Nth request a best-effort report. Terminal in one pass.
    ///
    /// ## Errors
    ///
    /// - `MalformedInput` / `MalformedToken`: the request was dropped and no
    ///   verdict was published
    async fn handle_message(&self, payload: &[u8]) -> Result<ValidationResponse, GateError>;

    /// Topics this gate consumes.
    fn request_topics(&self) -> Vec<String>;

    /// Running totals.
    fn stats(&self) -> GateStats;

    /// Snapshot of the current state as a report.
    fn report(&self) -> GateReport;
}
