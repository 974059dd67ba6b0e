//! Authority configuration with validation.

use crate::adapters::FaultInjectionConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

/// Authority configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Interface the REST server binds to
    pub host: IpAddr,
    /// REST port
    pub port: u16,
    /// Ledger file
    pub ledger_path: PathBuf,
    /// Optional file every received report is appended to
    pub reports_path: Option<PathBuf>,
    /// Fault injection on the validate endpoint (off by default)
    pub fault_injection: FaultInjectionConfig,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            ledger_path: PathBuf::from("tickets.csv"),
            reports_path: None,
            fault_injection: FaultInjectionConfig::None,
        }
    }
}

impl AuthorityConfig {
    /// Socket address of the REST server.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("ledger_path"));
        }
        if matches!(&self.reports_path, Some(p) if p.as_os_str().is_empty()) {
            return Err(ConfigError::EmptyPath("reports_path"));
        }
        if let FaultInjectionConfig::Random { rate } = self.fault_injection {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidFaultRate(rate));
            }
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    EmptyPath(&'static str),

    #[error("fault rate must be between 0 and 1, got {0}")]
    InvalidFaultRate(f64),
}
