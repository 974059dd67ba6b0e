//! # Node Configuration
//!
//! Layered, later layers win:
//!
//! 1. Built-in defaults
//! 2. JSON file (`--config`)
//! 3. `TK_*` environment variables
//! 4. Command-line flags (applied by `main`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tk_01_authority::{AuthorityConfig, FaultInjectionConfig};
use tk_02_gate::{GateConfig, ReportFormat};
use tracing::{info, warn};

/// Everything a `ticket-node` process may run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub authority: AuthorityConfig,
    /// Settings shared by every gate this process runs.
    pub gate: GateConfig,
    /// Gate ids started by `node` mode. Empty means just `gate.gate_id`.
    pub node_gates: Vec<String>,
}

impl NodeConfig {
    /// Defaults overlaid with an optional JSON file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `TK_*` overrides. Unparsable values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(key: &str, value: String) -> Option<T> {
            let out = value.parse().ok();
            if out.is_none() {
                warn!("Ignoring unparsable {key}={value:?}");
            }
            out
        }

        if let Some(v) = lookup("TK_HOST").and_then(|v| parsed("TK_HOST", v)) {
            self.authority.host = v;
        }
        if let Some(v) = lookup("TK_PORT").and_then(|v| parsed("TK_PORT", v)) {
            self.authority.port = v;
        }
        if let Some(v) = lookup("TK_LEDGER_PATH") {
            self.authority.ledger_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("TK_REPORTS_PATH") {
            self.authority.reports_path = Some(PathBuf::from(v));
        }
        if let Some(rate) = lookup("TK_FAULT_RATE").and_then(|v| parsed::<f64>("TK_FAULT_RATE", v)) {
            self.authority.fault_injection = FaultInjectionConfig::Random { rate };
        }
        if let Some(v) = lookup("TK_GATE_ID") {
            self.gate.gate_id = v;
        }
        if let Some(v) = lookup("TK_AUTHORITY_URL") {
            self.gate.authority_url = v;
        }
        if let Some(v) = lookup("TK_REPORT_EVERY").and_then(|v| parsed("TK_REPORT_EVERY", v)) {
            self.gate.report_every = v;
        }
        if let Some(v) = lookup("TK_REPORT_FORMAT") {
            match v.to_ascii_lowercase().as_str() {
                "json" => self.gate.report_format = ReportFormat::Json,
                "xml" => self.gate.report_format = ReportFormat::Xml,
                _ => warn!("Ignoring unparsable TK_REPORT_FORMAT={v:?}"),
            }
        }
    }

    /// Gate configs for `node` mode, one per id.
    pub fn gate_configs(&self) -> Vec<GateConfig> {
        if self.node_gates.is_empty() {
            return vec![self.gate.clone()];
        }
        self.node_gates
            .iter()
            .map(|id| GateConfig {
                gate_id: id.clone(),
                ..self.gate.clone()
            })
            .collect()
    }
}
