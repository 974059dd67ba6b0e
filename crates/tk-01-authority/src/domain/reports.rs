//! # Report Log
//!
//! Append-only log of reports pushed by the gates. Reports are stored as the
//! raw text received; no schema is imposed on ingestion.
//!
//! The log has its own lock, independent from the ledger's, so report intake
//! never contends with issuance or validation.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// One received report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub received_at: DateTime<Utc>,
    pub body: String,
}

/// In-memory report log with an optional best-effort file mirror.
#[derive(Debug, Default)]
pub struct ReportLog {
    entries: Mutex<Vec<ReportEntry>>,
    mirror: Option<PathBuf>,
}

impl ReportLog {
    /// Log kept in memory only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that also appends every report as one line to `path`.
    #[must_use]
    pub fn with_mirror(path: impl Into<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            mirror: Some(path.into()),
        }
    }

    /// Append a report. Mirror failures are logged and otherwise ignored.
    ///
    /// The mirror line is written with a single `write_all` while the log
    /// lock is held, so concurrent reports never share a line and the file
    /// keeps the in-memory order.
    pub fn append(&self, received_at: DateTime<Utc>, body: String) {
        let mut entries = self.entries.lock();

        if let Some(path) = &self.mirror {
            let mut line = body.replace(['\r', '\n'], " ");
            line.push('\n');
            let written = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| file.write_all(line.as_bytes()));
            if let Err(e) = written {
                warn!(path = %path.display(), error = %e, "[tk-01] Failed to mirror report");
            }
        }

        entries.push(ReportEntry { received_at, body });
        debug!(total = entries.len(), "[tk-01] Report logged");
    }

    /// Snapshot of every stored report, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.entries.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
