//! `mqtt-pub`: publish each message to a subject, then flush.

use crate::messages::Messages;
use anyhow::{Context, Result};
use mqtt_tools_client::Transport;
use mqtt_tools_payload::Payload;
use std::io::Read;

/// Log line for a published message.
///
/// Text payloads are shown verbatim, binary payloads as lowercase hex.
#[must_use]
pub fn published_line(subject: &str, payload: &Payload) -> String {
    format!("Published [{subject}] : '{}'", payload.display())
}

/// Publish `messages` (or all of `stdin` when empty) on `subject`.
///
/// Returns the number of messages published. The first failure aborts
/// the remaining messages.
///
/// # Errors
///
/// Returns error if a message cannot be resolved, published or flushed.
pub async fn run_publish<T: Transport>(
    transport: &mut T,
    subject: &str,
    messages: &[String],
    stdin: impl Read,
) -> Result<usize> {
    let mut published = 0;

    for payload in Messages::new(messages, stdin) {
        let payload = payload?;
        transport
            .publish(subject, &payload.bytes)
            .await
            .with_context(|| format!("publish on [{subject}]"))?;
        tracing::info!("{}", published_line(subject, &payload));
        published += 1;
    }

    transport.flush().await.context("flush")?;

    Ok(published)
}
