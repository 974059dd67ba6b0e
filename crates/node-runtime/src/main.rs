//! # Ticket Node
//!
//! Entry point for the ticketing services.
//!
//! ## Startup Sequence
//!
//! 1. Parse flags, initialise logging
//! 2. Load configuration (defaults → `--config` file → `TK_*` env → flags)
//! 3. Start the requested services
//! 4. Run until Ctrl+C, then signal shutdown and drain

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::driver::{feed_requests, log_responses};
use node_runtime::{build_gate, spawn_gate, start_authority, NodeConfig};
use shared_bus::InMemoryMessageBus;

/// Ticket issuance and validation node
#[derive(Parser, Debug)]
#[command(name = "ticket-node", version)]
#[command(about = "Ticket authority and gate validators")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run the Ticket Authority REST server
    Authority(AuthorityArgs),
    /// Run one Gate Validator on a local bus fed from stdin
    Gate(GateArgs),
    /// Run the authority, gates and an in-process bus fed from stdin
    Node {
        #[command(flatten)]
        authority: AuthorityArgs,
        #[command(flatten)]
        gate: GateArgs,
        /// Gate ids to start (comma separated)
        #[arg(long, value_delimiter = ',')]
        gates: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct AuthorityArgs {
    /// Interface to bind
    #[arg(long)]
    host: Option<IpAddr>,
    /// REST port
    #[arg(short, long)]
    port: Option<u16>,
    /// Ledger file
    #[arg(long)]
    ledger: Option<PathBuf>,
    /// File every received report is appended to
    #[arg(long)]
    reports: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GateArgs {
    /// Gate identity
    #[arg(long)]
    gate_id: Option<String>,
    /// Authority base URL
    #[arg(long)]
    authority_url: Option<String>,
}

impl AuthorityArgs {
    fn apply(self, config: &mut NodeConfig) {
        if let Some(host) = self.host {
            config.authority.host = host;
        }
        if let Some(port) = self.port {
            config.authority.port = port;
        }
        if let Some(ledger) = self.ledger {
            config.authority.ledger_path = ledger;
        }
        if let Some(reports) = self.reports {
            config.authority.reports_path = Some(reports);
        }
    }
}

impl GateArgs {
    fn apply(self, config: &mut NodeConfig) {
        if let Some(id) = self.gate_id {
            config.gate.gate_id = id;
        }
        if let Some(url) = self.authority_url {
            config.gate.authority_url = url;
        }
    }
}

/// Feed stdin lines onto the bus and log verdicts.
fn spawn_console(bus: &Arc<InMemoryMessageBus>) -> (JoinHandle<()>, JoinHandle<()>) {
    let responses = {
        let bus = bus.clone();
        tokio::spawn(async move {
            if let Err(e) = log_responses(bus.as_ref()).await {
                warn!(error = %e, "Verdict logger stopped");
            }
        })
    };
    let feeder = {
        let bus = bus.clone();
        tokio::spawn(async move {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            match feed_requests(stdin, bus.as_ref()).await {
                Ok(sent) => info!(sent, "Input closed"),
                Err(e) => warn!(error = %e, "Input error"),
            }
        })
    };
    (feeder, responses)
}

async fn wait_for_ctrl_c(shutdown_tx: watch::Sender<bool>) -> Result<()> {
    info!("Running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("Shutdown requested");
    let _ = shutdown_tx.send(true);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = NodeConfig::load(cli.config.as_deref())?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    match cli.mode {
        Mode::Authority(args) => {
            args.apply(&mut config);
            let (_, server) = start_authority(&config.authority, shutdown_rx).await?;
            wait_for_ctrl_c(shutdown_tx).await?;
            server.await?;
        }
        Mode::Gate(args) => {
            args.apply(&mut config);
            // Without a broker transport the gate listens on a local bus fed from stdin.
            let bus = Arc::new(InMemoryMessageBus::new());
            let gate = build_gate(config.gate.clone(), bus.clone())?;
            let runner = spawn_gate(gate, bus.clone(), shutdown_rx);
            let (feeder, responses) = spawn_console(&bus);

            wait_for_ctrl_c(shutdown_tx).await?;
            feeder.abort();
            runner.await?;
            bus.disconnect();
            let _ = responses.await;
        }
        Mode::Node {
            authority,
            gate,
            gates,
        } => {
            authority.apply(&mut config);
            gate.apply(&mut config);
            if !gates.is_empty() {
                config.node_gates = gates;
            }

            let (addr, server) = start_authority(&config.authority, shutdown_rx.clone()).await?;
            let local_url = format!("http://127.0.0.1:{}", addr.port());

            let bus = Arc::new(InMemoryMessageBus::new());
            let mut runners = Vec::new();
            for mut gate_config in config.gate_configs() {
                gate_config.authority_url = local_url.clone();
                let gate = build_gate(gate_config, bus.clone())?;
                runners.push(spawn_gate(gate, bus.clone(), shutdown_rx.clone()));
            }

            let (feeder, responses) = spawn_console(&bus);

            wait_for_ctrl_c(shutdown_tx).await?;
            feeder.abort();
            for runner in runners {
                runner.await?;
            }
            bus.disconnect();
            let _ = responses.await;
            server.await?;
        }
    }

    info!("Stopped");
    Ok(())
}
