//! # REST Surface
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | plaintext `OK` |
//! | POST | `/api/tickets/create` | issue a ticket |
//! | POST | `/api/tickets/validate` | check a token against the ledger |
//! | POST | `/api/reports` | store a gate report |
//! | GET | `/api/tickets` | all ledger entries (diagnostic) |
//! | GET | `/api/reports` | all stored reports (diagnostic) |

mod error;
pub mod handlers;

use crate::adapters::NoFaults;
use crate::ports::{FaultInjector, TicketAuthorityApi};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<dyn TicketAuthorityApi>,
    pub faults: Arc<dyn FaultInjector>,
}

impl AppState {
    /// State with fault injection disabled.
    pub fn new(authority: Arc<dyn TicketAuthorityApi>) -> Self {
        Self {
            authority,
            faults: Arc::new(NoFaults),
        }
    }

    #[must_use]
    pub fn with_faults(mut self, faults: Arc<dyn FaultInjector>) -> Self {
        self.faults = faults;
        self
    }
}

/// Build the authority router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/tickets/create", post(handlers::create_ticket))
        .route("/api/tickets/validate", post(handlers::validate_ticket))
        .route(
            "/api/reports",
            post(handlers::submit_report).get(handlers::list_reports),
        )
        .route("/api/tickets", get(handlers::list_tickets))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "[tk-01] Authority listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("[tk-01] Authority stopped");
    Ok(())
}
