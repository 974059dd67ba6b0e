//! REST client for the Ticket Authority.

use crate::domain::{GateReport, OnlineVerdict, ReportFormat, UpstreamError};
use crate::ports::outbound::AuthorityClient;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use shared_types::{ValidateTicketResponse, ValidationRequest};
use std::time::Duration;
use tracing::debug;

/// Authority client over HTTP.
pub struct HttpAuthorityClient {
    client: Client,
    base_url: String,
    report_format: ReportFormat,
}

impl HttpAuthorityClient {
    /// Create a client for the authority at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| UpstreamError::Connect(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            report_format: ReportFormat::default(),
        })
    }

    /// Send reports in `format` instead of JSON.
    #[must_use]
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Connect(e.to_string())
    }
}

#[async_trait]
impl AuthorityClient for HttpAuthorityClient {
    async fn validate(&self, token: &str) -> Result<OnlineVerdict, UpstreamError> {
        let response = self
            .client
            .post(self.url("/api/tickets/validate"))
            .json(&ValidationRequest {
                ticket_base64: token.to_string(),
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: ValidateTicketResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Body(e.to_string())
            }
        })?;
        if !body.success {
            return Err(UpstreamError::Body("success flag not set".to_string()));
        }

        debug!(ticket_id = %body.ticket_id, valid = body.valid, "[tk-02] Authority verdict");
        Ok(OnlineVerdict {
            valid: body.valid,
            message: body.message,
        })
    }

    async fn submit_report(&self, report: &GateReport) -> Result<(), UpstreamError> {
        let body = report
            .render(self.report_format)
            .map_err(|e| UpstreamError::Body(e.to_string()))?;
        let response = self
            .client
            .post(self.url("/api/reports"))
            .header(CONTENT_TYPE, self.report_format.content_type())
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        Ok(())
    }
}
