//! `mqtt-req`: send each message as a request and wait for one reply.

use crate::messages::Messages;
use crate::publish::published_line;
use anyhow::{Context, Result};
use mqtt_tools_client::{Reply, Transport};
use std::io::{Read, Write};
use std::time::Duration;

/// Time allowed for each reply.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Log line for a reply shown as text.
#[must_use]
pub fn received_line(reply: &Reply) -> String {
    format!(
        "Received [{}] : '{}'",
        reply.subject,
        String::from_utf8_lossy(&reply.data)
    )
}

/// Log line for a reply whose bytes go to the raw output instead.
#[must_use]
pub fn received_raw_line(reply: &Reply) -> String {
    format!("Received [{}] : {} bytes", reply.subject, reply.data.len())
}

/// Request on `subject` once per message (or once with all of `stdin`).
///
/// With `raw_output`, each reply's bytes are written there unmodified and
/// only their length is logged. Returns the number of replies received.
///
/// # Errors
///
/// Returns error if a message cannot be resolved, the request fails, no
/// reply arrives within [`REQUEST_TIMEOUT`], or the raw output fails.
pub async fn run_request<T: Transport, W: Write>(
    transport: &mut T,
    subject: &str,
    messages: &[String],
    stdin: impl Read,
    mut raw_output: Option<&mut W>,
) -> Result<usize> {
    let mut received = 0;

    for payload in Messages::new(messages, stdin) {
        let payload = payload?;
        let reply = transport
            .request(subject, &payload.bytes, REQUEST_TIMEOUT)
            .await
            .with_context(|| format!("request on [{subject}]"))?;

        tracing::info!("{}", published_line(subject, &payload));
        match raw_output.as_deref_mut() {
            Some(out) => {
                tracing::info!("{}", received_raw_line(&reply));
                out.write_all(&reply.data)
                    .and_then(|()| out.flush())
                    .context("failed to write reply")?;
            }
            None => tracing::info!("{}", received_line(&reply)),
        }
        received += 1;
    }

    Ok(received)
}
