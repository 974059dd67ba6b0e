//! Service bootstrap shared by the three `ticket-node` modes.

use anyhow::{Context, Result};
use shared_bus::{MessagePublisher, MessageSubscriber};
use std::net::SocketAddr;
use std::sync::Arc;
use tk_01_authority::{
    router, serve, AppState, AuthorityConfig, CsvLedgerStore, ReportLog, TicketAuthority,
};
use tk_02_gate::{GateConfig, GateRunner, GateValidator, HttpAuthorityClient};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Load the ledger, bind the REST listener and serve until shutdown.
///
/// Returns the bound address (useful with port 0) and the server task.
pub async fn start_authority(
    config: &AuthorityConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(SocketAddr, JoinHandle<()>)> {
    config.validate().context("Invalid authority configuration")?;

    let store = CsvLedgerStore::new(&config.ledger_path);
    let mut authority = TicketAuthority::open(store)
        .with_context(|| format!("Failed to load ledger {}", config.ledger_path.display()))?;
    if let Some(path) = &config.reports_path {
        authority = authority.with_report_log(ReportLog::with_mirror(path));
    }

    let state = AppState::new(Arc::new(authority)).with_faults(config.fault_injection.build());
    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        let signal = async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        };
        if let Err(e) = serve(listener, router(state), signal).await {
            error!(error = %e, "[tk-01] Authority server error");
        }
    });
    Ok((addr, handle))
}

/// Build a gate talking to its configured authority over HTTP.
pub fn build_gate(
    config: GateConfig,
    publisher: Arc<dyn MessagePublisher>,
) -> Result<Arc<GateValidator>> {
    config
        .validate()
        .with_context(|| format!("Invalid configuration for gate {}", config.gate_id))?;
    let client = HttpAuthorityClient::new(
        config.authority_url.clone(),
        config.connect_timeout(),
        config.request_timeout(),
    )
    .context("Failed to build authority client")?
    .with_report_format(config.report_format);
    info!(
        gate_id = %config.gate_id,
        authority = %config.authority_url,
        "[tk-02] Gate configured"
    );
    Ok(Arc::new(GateValidator::new(config, Arc::new(client), publisher)))
}

/// Start a gate's consumption loop.
pub fn spawn_gate<B>(
    gate: Arc<GateValidator>,
    bus: Arc<B>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    B: MessageSubscriber + 'static,
{
    let delay = gate.config().reconnect_delay();
    tokio::spawn(GateRunner::new(gate, bus, delay).run(shutdown))
}
