//! Request handlers for the authority's REST surface.
//!
//! Bodies are taken as raw text and parsed here so that shape errors come
//! back as `{success:false, error}` instead of axum's default rejection.

use super::AppState;
use crate::domain::AuthorityError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use shared_types::{
    CreateTicketRequest, CreateTicketResponse, ReportAck, Ticket, ValidateTicketResponse,
    ValidationRequest,
};

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, AuthorityError> {
    serde_json::from_str(body).map_err(|e| AuthorityError::MalformedInput(e.to_string()))
}

/// `GET /health`
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// `POST /api/tickets/create`
pub async fn create_ticket(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<CreateTicketResponse>, AuthorityError> {
    let request: CreateTicketRequest = parse_body(&body)?;

    // Issuance rewrites the ledger file; keep it off the async workers.
    let authority = state.authority.clone();
    let issued = tokio::task::spawn_blocking(move || {
        authority.issue(request.validity_days, request.line_number)
    })
    .await
    .map_err(|e| AuthorityError::Internal(e.to_string()))??;

    Ok(Json(CreateTicketResponse {
        success: true,
        ticket_id: issued.ticket.id.clone(),
        ticket: issued.ticket,
        ticket_base64: issued.token,
    }))
}

/// `POST /api/tickets/validate`
///
/// Every failure on this route, including an unreadable body or token, is a
/// 500. Gates treat any non-200 as "authority unavailable".
pub async fn validate_ticket(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ValidateTicketResponse>, Response> {
    check_token(&state, body)
        .await
        .map(Json)
        .map_err(|e| e.into_response_with(StatusCode::INTERNAL_SERVER_ERROR))
}

async fn check_token(
    state: &AppState,
    body: String,
) -> Result<ValidateTicketResponse, AuthorityError> {
    if state.faults.should_fail() {
        return Err(AuthorityError::InjectedFault);
    }
    let request: ValidationRequest = parse_body(&body)?;

    // Lookups share the ledger lock with issuance, which holds it across an fsync.
    let authority = state.authority.clone();
    let outcome =
        tokio::task::spawn_blocking(move || authority.validate(&request.ticket_base64))
            .await
            .map_err(|e| AuthorityError::Internal(e.to_string()))??;
    Ok(outcome.to_response())
}

/// `POST /api/reports`
pub async fn submit_report(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ReportAck>, AuthorityError> {
    // The report log may append to a file.
    let authority = state.authority.clone();
    tokio::task::spawn_blocking(move || authority.record_report(body))
        .await
        .map_err(|e| AuthorityError::Internal(e.to_string()))??;
    Ok(Json(ReportAck {
        success: true,
        message: "Report received".to_string(),
    }))
}

/// `GET /api/tickets`
pub async fn list_tickets(State(state): State<AppState>) -> Json<Vec<Ticket>> {
    Json(state.authority.tickets())
}

/// `GET /api/reports`
pub async fn list_reports(State(state): State<AppState>) -> impl IntoResponse {
    let reports = state.authority.reports();
    Json(serde_json::json!({
        "count": reports.len(),
        "reports": reports,
    }))
}
