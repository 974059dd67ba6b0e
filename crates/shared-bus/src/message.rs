//! # Bus Messages and Topics
//!
//! A message is a topic plus an opaque payload. Payloads on the ticket
//! topics are JSON documents from `shared_types::wire`.

use crate::subscriber::BusError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Topic names used by the ticketing agents.
pub mod topics {
    /// Validation requests addressed to every gate.
    pub const VALIDATION_REQUEST: &str = "ticket/validation/request";

    /// Verdicts published by gates.
    pub const VALIDATION_RESPONSE: &str = "ticket/validation/response";

    /// Validation requests addressed to one gate.
    #[must_use]
    pub fn validation_request_for(gate_id: &str) -> String {
        format!("{}/{}", VALIDATION_REQUEST, gate_id)
    }
}

/// A single message on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    /// Topic the message was published to.
    pub topic: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

impl BusMessage {
    /// Create a message from raw bytes.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Create a message with a JSON-encoded payload.
    pub fn json<T: Serialize>(topic: impl Into<String>, value: &T) -> Result<Self, BusError> {
        let payload =
            serde_json::to_vec(value).map_err(|e| BusError::Payload(e.to_string()))?;
        Ok(Self::new(topic, payload))
    }

    /// Decode the JSON payload.
    pub fn decode_json<T: DeserializeOwned>(&self) -> Result<T, BusError> {
        serde_json::from_slice(&self.payload).map_err(|e| BusError::Payload(e.to_string()))
    }

    /// Payload as text, lossily.
    #[must_use]
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Exact-match topic filter. An empty filter matches every topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    pub topics: Vec<String>,
}

impl TopicFilter {
    /// Match every topic.
    #[must_use]
    pub fn all() -> Self {
        Self { topics: Vec::new() }
    }

    /// Match any of the given topics.
    pub fn topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a message matches this filter.
    #[must_use]
    pub fn matches(&self, message: &BusMessage) -> bool {
        self.topics.is_empty() || self.topics.iter().any(|t| *t == message.topic)
    }
}
