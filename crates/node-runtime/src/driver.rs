//! # Console Driver
//!
//! Stands in for a real bus transport in `node` mode: every non-empty input
//! line becomes a validation request, and every verdict is logged.
//!
//! Line format: `<token>` (all gates) or `<gateId> <token>` (one gate).

use shared_bus::{
    topics, BusError, BusMessage, MessagePublisher, MessageSubscriber, TopicFilter,
};
use shared_types::{ValidationRequest, ValidationResponse};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Turn one input line into a bus message. `None` for blank lines.
pub fn request_for_line(line: &str) -> Option<Result<BusMessage, BusError>> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let (topic, token) = match parts.next() {
        Some(token) => (topics::validation_request_for(first), token),
        None => (topics::VALIDATION_REQUEST.to_string(), first),
    };
    Some(BusMessage::json(
        topic,
        &ValidationRequest {
            ticket_base64: token.to_string(),
        },
    ))
}

/// Publish a request per line of `input` until EOF. Returns the count sent.
pub async fn feed_requests<R, P>(input: R, publisher: &P) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    P: MessagePublisher + ?Sized,
{
    let mut lines = input.lines();
    let mut sent = 0;
    while let Some(line) = lines.next_line().await? {
        let Some(message) = request_for_line(&line) else {
            continue;
        };
        match message {
            Ok(message) => match publisher.publish(message).await {
                Ok(_) => sent += 1,
                Err(e) => warn!(error = %e, "Request not published"),
            },
            Err(e) => warn!(error = %e, "Request not encoded"),
        }
    }
    Ok(sent)
}

/// Log every verdict published on the response topic until the bus drops.
pub async fn log_responses<S>(bus: &S) -> Result<(), BusError>
where
    S: MessageSubscriber + ?Sized,
{
    let mut subscription = bus.subscribe(TopicFilter::topics([topics::VALIDATION_RESPONSE]))?;
    loop {
        let message = subscription.recv().await?;
        match message.decode_json::<ValidationResponse>() {
            Ok(v) => info!(
                gate_id = %v.gate_id,
                ticket_id = %v.ticket_id,
                action = ?v.gate_action,
                mode = %v.validation_mode,
                "{}",
                v.message
            ),
            Err(e) => warn!(error = %e, payload = %message.payload_text(), "Unreadable verdict"),
        }
    }
}
