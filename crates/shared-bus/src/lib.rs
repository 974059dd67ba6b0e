//! # Shared Bus - Message Bus Client
//!
//! The generic publish/subscribe client the gates consume validation
//! requests from and publish verdicts to.
//!
//! ```text
//! ┌──────────────┐   ticket/validation/request[/<gateId>]   ┌──────────────┐
//! │  Requester   │ ───────────────────────────────────────→ │     Gate     │
//! │              │ ←─────────────────────────────────────── │  Validator   │
//! └──────────────┘        ticket/validation/response        └──────────────┘
//! ```
//!
//! ## Transport Loss
//!
//! A lost transport surfaces as [`BusError::Disconnected`] on `recv`,
//! `subscribe` and `publish`. Consumers pause briefly and resubscribe; they
//! never terminate on it.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod message;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use message::{topics, BusMessage, TopicFilter};
pub use publisher::{InMemoryMessageBus, MessagePublisher};
pub use subscriber::{BusError, MessageSubscriber, Subscription};

/// Maximum messages to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
