//! # Gate Validator Service
//!
//! Per-request state machine:
//!
//! ```text
//! payload ─→ decode ──(malformed)──→ abort, nothing published
//!              │
//!              ↓
//!        online check ──(unreachable / timeout / non-success)──→ offline check
//!              │                                                    │
//!              └──────────────────────┬─────────────────────────────┘
//!                                     ↓
//!                     record ─→ publish ─→ every Nth: spawn report
//! ```
//!
//! The mode can flip from one request to the next; no state carries over
//! beyond history and counters.

use crate::config::GateConfig;
use crate::domain::{
    GateError, GateReport, GateStats, GateVerdict, UpstreamError, ValidationHistory,
    ValidationRecord,
};
use crate::ports::inbound::GateValidatorApi;
use crate::ports::outbound::AuthorityClient;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::{topics, BusMessage, MessagePublisher};
use shared_types::{
    decode, GateAction, SystemTimeSource, TicketTimestamp, TimeSource, ValidationRequest,
    ValidationResponse,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct GateState {
    history: ValidationHistory,
    stats: GateStats,
}

/// A gate: validates tickets presented to it and publishes verdicts.
pub struct GateValidator {
    config: GateConfig,
    authority: Arc<dyn AuthorityClient>,
    publisher: Arc<dyn MessagePublisher>,
    time: Arc<dyn TimeSource>,
    state: Mutex<GateState>,
}

impl GateValidator {
    /// Create a gate on the system clock.
    pub fn new(
        config: GateConfig,
        authority: Arc<dyn AuthorityClient>,
        publisher: Arc<dyn MessagePublisher>,
    ) -> Self {
        Self::with_time_source(config, authority, publisher, Arc::new(SystemTimeSource))
    }

    /// Create a gate with an explicit clock.
    pub fn with_time_source(
        config: GateConfig,
        authority: Arc<dyn AuthorityClient>,
        publisher: Arc<dyn MessagePublisher>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        let history = ValidationHistory::new(config.history_capacity);
        Self {
            config,
            authority,
            publisher,
            time,
            state: Mutex::new(GateState {
                history,
                stats: GateStats::default(),
            }),
        }
    }

    pub fn gate_id(&self) -> &str {
        &self.config.gate_id
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Up to `n` most recent records, newest first.
    pub fn recent(&self, n: usize) -> Vec<ValidationRecord> {
        self.state.lock().history.recent(n)
    }

    async fn online_check(&self, token: &str) -> Result<GateVerdict, UpstreamError> {
        // The client has its own timeouts; this bounds adapters that do not.
        match tokio::time::timeout(self.config.request_timeout(), self.authority.validate(token))
            .await
        {
            Ok(result) => result.map(GateVerdict::online),
            Err(_) => Err(UpstreamError::Timeout),
        }
    }

    /// Record the verdict; returns a report if this request completes a cycle.
    fn record(&self, ticket_id: &str, verdict: &GateVerdict) -> Option<GateReport> {
        let now = TicketTimestamp::from_datetime(self.time.now());
        let mut state = self.state.lock();
        state.stats.record(verdict.valid, verdict.mode);
        state.history.push(ValidationRecord {
            ticket_id: ticket_id.to_string(),
            timestamp: now.clone(),
            valid: verdict.valid,
            mode: verdict.mode,
        });

        let every = self.config.report_every;
        if every > 0 && state.stats.total_processed % every == 0 {
            Some(GateReport::snapshot(
                &self.config.gate_id,
                now,
                &state.stats,
                &state.history,
                self.config.report_window,
            ))
        } else {
            None
        }
    }

    async fn publish(&self, response: &ValidationResponse) {
        let message = match BusMessage::json(topics::VALIDATION_RESPONSE, response) {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "[tk-02] Could not encode verdict");
                return;
            }
        };
        if let Err(e) = self.publisher.publish(message).await {
            warn!(
                ticket_id = %response.ticket_id,
                error = %e,
                "[tk-02] Verdict not published"
            );
        }
    }

    /// Deliver a report in the background. Failures are logged and dropped.
    fn dispatch_report(&self, report: GateReport) {
        let authority = Arc::clone(&self.authority);
        tokio::spawn(async move {
            match authority.submit_report(&report).await {
                Ok(()) => info!(
                    gate_id = %report.gate_id,
                    total = report.total_processed,
                    "[tk-02] Report sent"
                ),
                Err(e) => warn!(
                    gate_id = %report.gate_id,
                    error = %e,
                    "[tk-02] Report not delivered"
                ),
            }
        });
    }
}

#[async_trait]
impl GateValidatorApi for GateValidator {
    async fn handle_message(&self, payload: &[u8]) -> Result<ValidationResponse, GateError> {
        let request: ValidationRequest = serde_json::from_slice(payload).map_err(|e| {
            warn!(error = %e, "[tk-02] Dropping malformed request");
            GateError::MalformedInput(e.to_string())
        })?;
        let ticket = decode(&request.ticket_base64).map_err(|e| {
            warn!(error = %e, "[tk-02] Dropping undecodable ticket");
            GateError::from(e)
        })?;
        debug!(
            ticket_id = %ticket.id,
            line_number = ticket.line_number,
            "[tk-02] Validation request"
        );

        let verdict = match self.online_check(&request.ticket_base64).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(
                    ticket_id = %ticket.id,
                    error = %e,
                    "[tk-02] Authority unavailable, using offline check"
                );
                GateVerdict::offline(&ticket, self.time.now())
            }
        };

        let report = self.record(&ticket.id, &verdict);

        let response = ValidationResponse {
            gate_id: self.config.gate_id.clone(),
            ticket_id: ticket.id,
            valid: verdict.valid,
            gate_action: GateAction::for_verdict(verdict.valid),
            validation_mode: verdict.mode,
            message: verdict.message,
        };
        info!(
            ticket_id = %response.ticket_id,
            action = ?response.gate_action,
            mode = %response.validation_mode,
            "[tk-02] {}",
            response.message
        );
        self.publish(&response).await;

        if let Some(report) = report {
            self.dispatch_report(report);
        }
        Ok(response)
    }

    fn request_topics(&self) -> Vec<String> {
        vec![
            topics::VALIDATION_REQUEST.to_string(),
            topics::validation_request_for(&self.config.gate_id),
        ]
    }

    fn stats(&self) -> GateStats {
        self.state.lock().stats
    }

    fn report(&self) -> GateReport {
        let now = TicketTimestamp::from_datetime(self.time.now());
        let state = self.state.lock();
        GateReport::snapshot(
            &self.config.gate_id,
            now,
            &state.stats,
            &state.history,
            self.config.report_window,
        )
    }
}
