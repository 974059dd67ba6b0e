//! Gate configuration with validation.

use crate::domain::{ReportFormat, DEFAULT_HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Identity reported on verdicts and reports; also selects the
    /// gate-specific request topic
    pub gate_id: String,
    /// Base URL of the authority's REST surface
    pub authority_url: String,
    /// Connect timeout for authority calls
    pub connect_timeout_ms: u64,
    /// Overall timeout for authority calls
    pub request_timeout_ms: u64,
    /// Bound on the in-memory validation history
    pub history_capacity: usize,
    /// Send a report every this many processed requests (0 disables)
    pub report_every: u64,
    /// Number of recent records included in a report
    pub report_window: usize,
    /// Body format of reports (`json` or `xml`)
    pub report_format: ReportFormat,
    /// Pause before resubscribing after the bus drops
    pub reconnect_delay_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            gate_id: "001".to_string(),
            authority_url: "http://localhost:8080".to_string(),
            connect_timeout_ms: 2_000,
            request_timeout_ms: 5_000,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            report_every: 10,
            report_window: 10,
            report_format: ReportFormat::Json,
            reconnect_delay_ms: 1_000,
        }
    }
}

impl GateConfig {
    /// Config for `gate_id` with every other setting at its default.
    pub fn for_gate(gate_id: impl Into<String>) -> Self {
        Self {
            gate_id: gate_id.into(),
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gate_id.trim().is_empty() {
            return Err(ConfigError::EmptyGateId);
        }
        if self.gate_id.contains(['/', '+', '#']) {
            return Err(ConfigError::InvalidGateId(self.gate_id.clone()));
        }
        if !(self.authority_url.starts_with("http://") || self.authority_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidAuthorityUrl(self.authority_url.clone()));
        }
        if self.connect_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout(
                "authority timeouts cannot be 0".into(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidLimit(
                "history_capacity cannot be 0".into(),
            ));
        }
        if self.report_window > self.history_capacity {
            return Err(ConfigError::InvalidLimit(format!(
                "report_window ({}) exceeds history_capacity ({})",
                self.report_window, self.history_capacity
            )));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("gate_id cannot be empty")]
    EmptyGateId,

    #[error("gate_id {0:?} must not contain topic separators or wildcards")]
    InvalidGateId(String),

    #[error("authority_url must be an http(s) URL, got {0:?}")]
    InvalidAuthorityUrl(String),

    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}
