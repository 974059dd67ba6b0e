//! Gate statistics and the report snapshot pushed to the authority.
//!
//! A report goes out either as JSON (default) or as a `<GateReport>` XML
//! document for back offices that expect that layout.

use super::history::{ValidationHistory, ValidationRecord};
use serde::{Deserialize, Serialize};
use shared_types::{TicketTimestamp, ValidationMode};
use std::fmt::Write as _;

/// Wire format of a report body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Xml,
}

impl ReportFormat {
    /// `Content-Type` of a body in this format.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Xml => "application/xml",
        }
    }
}

/// Running totals since process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateStats {
    pub total_processed: u64,
    pub valid_count: u64,
    pub invalid_count: u64,
    pub online_count: u64,
    pub offline_count: u64,
}

impl GateStats {
    /// Count one processed request.
    pub fn record(&mut self, valid: bool, mode: ValidationMode) {
        self.total_processed += 1;
        if valid {
            self.valid_count += 1;
        } else {
            self.invalid_count += 1;
        }
        match mode {
            ValidationMode::Online => self.online_count += 1,
            ValidationMode::Offline => self.offline_count += 1,
        }
    }
}

/// Read-only snapshot sent to `POST /api/reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateReport {
    pub gate_id: String,
    pub generated_at: TicketTimestamp,
    pub total_processed: u64,
    pub valid_count: u64,
    pub invalid_count: u64,
    pub online_count: u64,
    pub offline_count: u64,
    /// Newest first.
    pub recent_validations: Vec<ValidationRecord>,
}

impl GateReport {
    /// Build a report from the current totals and the last `window` records.
    #[must_use]
    pub fn snapshot(
        gate_id: &str,
        generated_at: TicketTimestamp,
        stats: &GateStats,
        history: &ValidationHistory,
        window: usize,
    ) -> Self {
        Self {
            gate_id: gate_id.to_string(),
            generated_at,
            total_processed: stats.total_processed,
            valid_count: stats.valid_count,
            invalid_count: stats.invalid_count,
            online_count: stats.online_count,
            offline_count: stats.offline_count,
            recent_validations: history.recent(window),
        }
    }
}

impl GateReport {
    /// Render the body in `format`.
    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Json => serde_json::to_string(self),
            ReportFormat::Xml => Ok(self.to_xml()),
        }
    }

    /// `<GateReport>` document. Text content is escaped.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<GateReport>\n");
        // Writing into a String cannot fail.
        let _ = writeln!(xml, "  <GateId>{}</GateId>", escape_xml(&self.gate_id));
        let _ = writeln!(
            xml,
            "  <Timestamp>{}</Timestamp>",
            escape_xml(self.generated_at.as_str())
        );
        xml.push_str("  <Statistics>\n");
        let _ = writeln!(xml, "    <TotalProcessed>{}</TotalProcessed>", self.total_processed);
        let _ = writeln!(xml, "    <ValidCount>{}</ValidCount>", self.valid_count);
        let _ = writeln!(xml, "    <InvalidCount>{}</InvalidCount>", self.invalid_count);
        let _ = writeln!(xml, "    <OnlineCount>{}</OnlineCount>", self.online_count);
        let _ = writeln!(xml, "    <OfflineCount>{}</OfflineCount>", self.offline_count);
        xml.push_str("  </Statistics>\n  <RecentValidations>\n");
        for record in &self.recent_validations {
            xml.push_str("    <Validation>\n");
            let _ = writeln!(
                xml,
                "      <TicketId>{}</TicketId>",
                escape_xml(&record.ticket_id)
            );
            let _ = writeln!(
                xml,
                "      <Timestamp>{}</Timestamp>",
                escape_xml(record.timestamp.as_str())
            );
            let _ = writeln!(xml, "      <Valid>{}</Valid>", record.valid);
            let _ = writeln!(xml, "      <Mode>{}</Mode>", record.mode);
            xml.push_str("    </Validation>\n");
        }
        xml.push_str("  </RecentValidations>\n</GateReport>\n");
        xml
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
