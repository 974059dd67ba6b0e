//! # Message Subscriber
//!
//! Defines the subscription side of the bus.

use crate::message::{BusMessage, TopicFilter};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Errors from bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The transport is gone. Subscribers should pause and resubscribe.
    #[error("Message bus disconnected")]
    Disconnected,

    /// A payload could not be encoded or decoded.
    #[error("Invalid bus payload: {0}")]
    Payload(String),
}

/// Trait for subscribing to topics on the bus.
pub trait MessageSubscriber: Send + Sync {
    /// Subscribe to messages matching a filter.
    ///
    /// Fails with [`BusError::Disconnected`] while the transport is down.
    fn subscribe(&self, filter: TopicFilter) -> Result<Subscription, BusError>;
}

/// A subscription handle for receiving messages.
pub struct Subscription {
    receiver: broadcast::Receiver<BusMessage>,
    filter: TopicFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<BusMessage>, filter: TopicFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next message that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Ok(message)` - The next matching message
    /// - `Err(BusError::Disconnected)` - The transport was lost
    pub async fn recv(&mut self) -> Result<BusMessage, BusError> {
        loop {
            let message = match self.receiver.recv().await {
                Ok(m) => m,
                Err(broadcast::error::RecvError::Closed) => return Err(BusError::Disconnected),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(lagged = count, "Subscriber lagged, some messages dropped");
                    continue;
                }
            };

            if self.filter.matches(&message) {
                return Ok(message);
            }
        }
    }

    /// Try to receive the next message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was available and matched
    /// - `Ok(None)` - No message available (would block)
    /// - `Err(BusError::Disconnected)` - The transport was lost
    pub fn try_recv(&mut self) -> Result<Option<BusMessage>, BusError> {
        loop {
            let message = match self.receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(BusError::Disconnected)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&message) {
                return Ok(Some(message));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!(topics = ?self.filter.topics, "Subscription dropped");
    }
}
