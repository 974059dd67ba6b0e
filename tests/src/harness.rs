//! Fixtures shared by the integration tests.

use shared_bus::{
    topics, BusMessage, InMemoryMessageBus, MessagePublisher, MessageSubscriber, Subscription,
    TopicFilter,
};
use shared_types::{CreateTicketResponse, ValidationRequest, ValidationResponse};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tk_01_authority::{
    router, serve, AppState, CsvLedgerStore, FaultInjector, NoFaults, TicketAuthority,
};
use tk_02_gate::{GateConfig, GateRunner, GateValidator, HttpAuthorityClient};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// How long a test waits for anything asynchronous.
pub const WAIT: Duration = Duration::from_secs(5);

/// A running authority server on `127.0.0.1:<ephemeral>`.
pub struct AuthorityServer {
    pub addr: SocketAddr,
    pub authority: Arc<TicketAuthority<CsvLedgerStore>>,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl AuthorityServer {
    /// Start an authority over the ledger at `ledger`.
    pub async fn start(ledger: &Path) -> Self {
        Self::start_with_faults(ledger, Arc::new(NoFaults)).await
    }

    pub async fn start_with_faults(ledger: &Path, faults: Arc<dyn FaultInjector>) -> Self {
        let authority = Arc::new(
            TicketAuthority::open(CsvLedgerStore::new(ledger)).expect("ledger should load"),
        );
        let state = AppState::new(authority.clone()).with_faults(faults);
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let signal = async move {
                let _ = stopped.await;
            };
            serve(listener, router(state), signal).await.expect("serve");
        });

        Self {
            addr,
            authority,
            stop: Some(stop),
            task,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Issue a ticket through the REST surface.
    pub async fn create_ticket(&self, validity_days: i32, line_number: i32) -> CreateTicketResponse {
        reqwest::Client::new()
            .post(format!("{}/api/tickets/create", self.url()))
            .json(&serde_json::json!({
                "validityDays": validity_days,
                "lineNumber": line_number,
            }))
            .send()
            .await
            .expect("create request")
            .json()
            .await
            .expect("create response")
    }

    /// `GET <path>` as JSON.
    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        reqwest::get(format!("{}{}", self.url(), path))
            .await
            .expect("get request")
            .json()
            .await
            .expect("json body")
    }

    /// Graceful shutdown.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = tokio::time::timeout(WAIT, &mut self.task).await;
    }
}

/// An HTTP server answering with whatever `router` does, standing in for a
/// misbehaving authority. Stops when dropped.
pub struct StubAuthority {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl StubAuthority {
    pub async fn start(router: axum::Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Self { addr, task }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for StubAuthority {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A URL nothing listens on.
pub fn dead_authority_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// A gate running its real consumption loop on a private bus.
pub struct GateFixture {
    pub bus: Arc<InMemoryMessageBus>,
    pub gate: Arc<GateValidator>,
    responses: Subscription,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl GateFixture {
    /// Start a gate pointed at `authority_url`.
    pub async fn start(gate_id: &str, authority_url: String) -> Self {
        Self::start_with(GateConfig {
            authority_url,
            connect_timeout_ms: 500,
            request_timeout_ms: 2_000,
            reconnect_delay_ms: 20,
            ..GateConfig::for_gate(gate_id)
        })
        .await
    }

    pub async fn start_with(config: GateConfig) -> Self {
        let bus = Arc::new(InMemoryMessageBus::new());
        let client = HttpAuthorityClient::new(
            config.authority_url.clone(),
            config.connect_timeout(),
            config.request_timeout(),
        )
        .expect("client")
        .with_report_format(config.report_format);
        let delay = config.reconnect_delay();
        let gate = Arc::new(GateValidator::new(config, Arc::new(client), bus.clone()));

        let responses = bus
            .subscribe(TopicFilter::topics([topics::VALIDATION_RESPONSE]))
            .expect("subscribe");
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(GateRunner::new(gate.clone(), bus.clone(), delay).run(shutdown_rx));

        // Wait until the runner has subscribed.
        let deadline = tokio::time::Instant::now() + WAIT;
        while bus.subscriber_count() < 2 {
            assert!(tokio::time::Instant::now() < deadline, "gate never subscribed");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        Self {
            bus,
            gate,
            responses,
            shutdown,
            task,
        }
    }

    /// Publish `token` on `topic` and wait for the gate's verdict.
    pub async fn present_on(&mut self, topic: String, token: &str) -> ValidationResponse {
        let message = BusMessage::json(
            topic,
            &ValidationRequest {
                ticket_base64: token.to_string(),
            },
        )
        .expect("encode request");
        self.bus.publish(message).await.expect("publish");

        let verdict = tokio::time::timeout(WAIT, self.responses.recv())
            .await
            .expect("verdict in time")
            .expect("bus open");
        verdict.decode_json().expect("verdict payload")
    }

    /// Present a token on the broadcast request topic.
    pub async fn present(&mut self, token: &str) -> ValidationResponse {
        self.present_on(topics::VALIDATION_REQUEST.to_string(), token)
            .await
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = tokio::time::timeout(WAIT, self.task).await;
    }
}
