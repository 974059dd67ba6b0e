//! # Message Publisher
//!
//! Defines the publishing side of the bus and the in-process implementation.

use crate::message::{BusMessage, TopicFilter};
use crate::subscriber::{BusError, MessageSubscriber, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Trait for publishing messages to the bus.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish a message.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the message.
    async fn publish(&self, message: BusMessage) -> Result<usize, BusError>;
}

/// In-memory implementation of the message bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer semantics.
/// Suitable for running the authority and gates in one process; a broker
/// client would implement the same traits for distributed deployments.
///
/// [`disconnect`](Self::disconnect) simulates transport loss: every live
/// subscription observes [`BusError::Disconnected`] and publishes fail until
/// [`reconnect`](Self::reconnect) is called.
pub struct InMemoryMessageBus {
    sender: RwLock<broadcast::Sender<BusMessage>>,
    connected: AtomicBool,
    messages_published: AtomicU64,
    capacity: usize,
}

impl InMemoryMessageBus {
    /// Create a new in-memory bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: RwLock::new(sender),
            connected: AtomicBool::new(true),
            messages_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Drop the transport. Existing subscriptions are closed.
    pub fn disconnect(&self) {
        let (fresh, _) = broadcast::channel(self.capacity);
        self.connected.store(false, Ordering::SeqCst);
        // Dropping the old sender closes every receiver subscribed to it.
        drop(std::mem::replace(&mut *self.sender.write(), fresh));
        warn!("Message bus disconnected");
    }

    /// Restore the transport. Subscribers must subscribe again.
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        info!("Message bus reconnected");
    }

    /// Whether the transport is currently up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.read().receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total messages accepted for publishing.
    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSubscriber for InMemoryMessageBus {
    fn subscribe(&self, filter: TopicFilter) -> Result<Subscription, BusError> {
        if !self.is_connected() {
            return Err(BusError::Disconnected);
        }
        let receiver = self.sender.read().subscribe();
        debug!(topics = ?filter.topics, "New subscription created");
        Ok(Subscription::new(receiver, filter))
    }
}

#[async_trait]
impl MessagePublisher for InMemoryMessageBus {
    async fn publish(&self, message: BusMessage) -> Result<usize, BusError> {
        if !self.is_connected() {
            return Err(BusError::Disconnected);
        }
        self.messages_published.fetch_add(1, Ordering::Relaxed);

        let topic = message.topic.clone();
        let sent = self.sender.read().send(message);
        match sent {
            Ok(receivers) => {
                debug!(topic = %topic, receivers, "Message published");
                Ok(receivers)
            }
            Err(_) => {
                // No receivers - message is dropped
                debug!(topic = %topic, "Message dropped (no subscribers)");
                Ok(0)
            }
        }
    }
}
