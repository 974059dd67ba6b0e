//! # Outbound Ports (Driven Ports)

use crate::domain::{GateReport, OnlineVerdict, UpstreamError};
use async_trait::async_trait;

/// The authority as seen from a gate.
///
/// Production: `HttpAuthorityClient`
#[async_trait]
pub trait AuthorityClient: Send + Sync {
    /// Ask the authority for a verdict on `token`.
    ///
    /// Any error means the authority is unavailable for this request.
    async fn validate(&self, token: &str) -> Result<OnlineVerdict, UpstreamError>;

    /// Push a report. Callers treat failures as non-fatal.
    async fn submit_report(&self, report: &GateReport) -> Result<(), UpstreamError>;
}
