//! # Consumption Loop
//!
//! Pulls one request at a time off the bus and hands it to the gate.
//! Transport loss pauses the loop and resubscribes; it never terminates it.
//! Only the shutdown signal stops the loop.

use crate::ports::inbound::GateValidatorApi;
use shared_bus::{BusError, MessageSubscriber, Subscription, TopicFilter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Drives one gate from a bus subscription.
pub struct GateRunner<G: ?Sized, B: ?Sized> {
    gate: Arc<G>,
    bus: Arc<B>,
    reconnect_delay: Duration,
}

impl<G, B> GateRunner<G, B>
where
    G: GateValidatorApi + ?Sized,
    B: MessageSubscriber + ?Sized,
{
    pub fn new(gate: Arc<G>, bus: Arc<B>, reconnect_delay: Duration) -> Self {
        Self {
            gate,
            bus,
            reconnect_delay,
        }
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped).
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let filter = TopicFilter::topics(self.gate.request_topics());
        info!(topics = ?filter.topics, "[tk-02] Gate consumption loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.bus.subscribe(filter.clone()) {
                Ok(subscription) => {
                    debug!("[tk-02] Subscribed to validation requests");
                    if self.consume(subscription, &mut shutdown).await {
                        break;
                    }
                    warn!("[tk-02] Message bus connection lost, reconnecting");
                }
                Err(e) => {
                    warn!(error = %e, "[tk-02] Subscribe failed, retrying");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let stats = self.gate.stats();
        info!(
            processed = stats.total_processed,
            valid = stats.valid_count,
            invalid = stats.invalid_count,
            "[tk-02] Gate consumption loop stopped"
        );
    }

    /// Process messages until the transport drops (`false`) or shutdown is
    /// requested (`true`).
    async fn consume(
        &self,
        mut subscription: Subscription,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return true;
                    }
                }
                message = subscription.recv() => match message {
                    Ok(message) => {
                        // Errors are logged by the gate; the request is simply dropped.
                        let _ = self.gate.handle_message(&message.payload).await;
                    }
                    Err(BusError::Disconnected) => return false,
                    Err(e) => warn!(error = %e, "[tk-02] Bus receive error"),
                },
            }
        }
    }
}
