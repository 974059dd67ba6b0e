use crate::domain::LedgerStoreError;
use crate::ports::outbound::{LedgerStore, LoadedLedger};
use shared_types::{Ticket, TicketTimestamp};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Header row of the ledger file.
pub const LEDGER_HEADER: &str = "TicketID,CreationDate,ValidityDays,LineNumber";

/// Ledger persisted as delimited text, one row per ticket.
///
/// The whole file is rewritten on every issuance. Writes go to a sibling
/// temp file which is fsynced and renamed over the ledger, so a crash never
/// leaves a truncated ledger behind.
pub struct CsvLedgerStore {
    path: PathBuf,
}

impl CsvLedgerStore {
    /// Create a store backed by the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the ledger file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> LedgerStoreError {
        LedgerStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Parse one data row. `None` if any field is missing or unparsable.
fn parse_row(line: &str) -> Option<Ticket> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [id, date, days, line_number] = fields.as_slice() else {
        return None;
    };
    if id.is_empty() {
        return None;
    }
    let issued_at = TicketTimestamp::from_raw(*date);
    issued_at.to_datetime()?;

    Some(Ticket {
        id: (*id).to_string(),
        issued_at,
        validity_days: days.parse().ok()?,
        line_number: line_number.parse().ok()?,
    })
}

fn render(tickets: &[Ticket]) -> String {
    let mut out = String::with_capacity(64 * (tickets.len() + 1));
    out.push_str(LEDGER_HEADER);
    out.push('\n');
    for t in tickets {
        out.push_str(&format!(
            "{},{},{},{}\n",
            t.id, t.issued_at, t.validity_days, t.line_number
        ));
    }
    out
}

impl LedgerStore for CsvLedgerStore {
    fn load(&self) -> Result<LoadedLedger, LedgerStoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[tk-01] No existing ledger at {}", self.path.display());
                return Ok(LoadedLedger::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut loaded = LoadedLedger::default();
        for (number, line) in text.lines().enumerate() {
            if number == 0 && line.trim_start().starts_with("TicketID") {
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(line) {
                Some(ticket) => loaded.tickets.push(ticket),
                None => {
                    warn!(row = number + 1, "[tk-01] Skipping unparsable ledger row");
                    loaded.skipped_rows += 1;
                }
            }
        }

        info!(
            "[tk-01] Loaded {} tickets from {} ({} rows skipped)",
            loaded.tickets.len(),
            self.path.display(),
            loaded.skipped_rows
        );
        Ok(loaded)
    }

    fn persist(&mut self, tickets: &[Ticket]) -> Result<(), LedgerStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        // Write atomically via temp file
        let temp_path = self.temp_path();
        let mut file = std::fs::File::create(&temp_path).map_err(|e| self.io_error(e))?;
        file.write_all(render(tickets).as_bytes())
            .map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        drop(file);

        std::fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))
    }
}
