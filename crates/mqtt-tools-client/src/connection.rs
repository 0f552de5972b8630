//! Broker connection driven inline by each operation.
//!
//! `rumqttc` only moves packets while its event loop is polled. The tools
//! are strictly sequential, so instead of spawning the loop onto a task each
//! operation queues its request and then polls until the packet it cares
//! about shows up: the outgoing PUBLISH, the PUBACKs, the SUBACK or a reply
//! on the inbox.

use crate::address::BrokerAddr;
use crate::config::BrokerConfig;
use crate::error::ClientError;
use crate::transport::{Reply, Transport};
use bytes::Bytes;
use rumqttc::v5::mqttbytes::v5::{Packet, PublishProperties};
use rumqttc::v5::mqttbytes::QoS;
use rumqttc::v5::{AsyncClient, Event, EventLoop, MqttOptions};
use rumqttc::Outgoing;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

/// Capacity of the request channel between client handle and event loop.
const REQUEST_CAPACITY: usize = 16;
/// Topic prefix for reply inboxes.
const INBOX_PREFIX: &str = "_INBOX";
/// Time allowed for the DISCONNECT to be written on close.
const CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

/// An established broker session.
pub struct Connection {
    client: AsyncClient,
    eventloop: EventLoop,
    server: BrokerAddr,
    flush_timeout: Duration,
    unacked: usize,
    inbox: Option<String>,
}

impl Connection {
    /// Connect to the first server in `config` that accepts the session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connection`] naming the last failure if no
    /// server answers with a successful CONNACK in time.
    pub async fn connect(config: &BrokerConfig) -> Result<Self, ClientError> {
        let mut last_error = None;

        for server in &config.servers {
            match Self::connect_to(config, server).await {
                Ok(connection) => {
                    tracing::debug!(%server, client_id = %config.client_id, "Connected to broker");
                    return Ok(connection);
                }
                Err(err) => {
                    tracing::debug!(%server, error = %err, "Broker connection attempt failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ClientError::Connection("no broker servers configured".into())))
    }

    async fn connect_to(config: &BrokerConfig, server: &BrokerAddr) -> Result<Self, ClientError> {
        let mut options =
            MqttOptions::new(config.client_id.as_str(), server.host.as_str(), server.port);
        options.set_keep_alive(config.keep_alive);
        if let Some(credentials) = &config.credentials {
            options.set_credentials(&credentials.username, &credentials.password);
        }

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);

        let mut connection = Self {
            client,
            eventloop,
            server: server.clone(),
            flush_timeout: config.flush_timeout,
            unacked: 0,
            inbox: None,
        };

        match timeout(config.connect_timeout, connection.wait_for_connack()).await {
            Ok(Ok(())) => Ok(connection),
            Ok(Err(ClientError::Connection(reason))) => {
                Err(ClientError::Connection(format!("{server}: {reason}")))
            }
            Ok(Err(err)) => Err(err),
            Err(_) => Err(ClientError::Connection(format!(
                "{server}: no CONNACK within {:?}",
                config.connect_timeout
            ))),
        }
    }

    /// The server this connection is attached to.
    #[must_use]
    pub fn server(&self) -> &BrokerAddr {
        &self.server
    }

    /// Send DISCONNECT and give the event loop a moment to write it.
    pub async fn close(mut self) {
        if let Err(err) = self.client.disconnect().await {
            tracing::debug!(error = %err, "Failed to queue disconnect");
            return;
        }

        let drained = timeout(CLOSE_TIMEOUT, async {
            loop {
                match self.eventloop.poll().await {
                    Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::debug!(server = %self.server, "Disconnect not confirmed before close");
        }
    }

    /// Poll the event loop once, keeping the acknowledgement count current.
    async fn next_event(&mut self) -> Result<Event, ClientError> {
        let event = self
            .eventloop
            .poll()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        if let Event::Incoming(Packet::PubAck(_)) = &event {
            self.unacked = self.unacked.saturating_sub(1);
        }

        Ok(event)
    }

    async fn wait_for_connack(&mut self) -> Result<(), ClientError> {
        loop {
            if let Event::Incoming(Packet::ConnAck(_)) = self.next_event().await? {
                return Ok(());
            }
        }
    }

    async fn wait_for_written_publish(&mut self) -> Result<(), ClientError> {
        loop {
            if let Event::Outgoing(Outgoing::Publish(_)) = self.next_event().await? {
                return Ok(());
            }
        }
    }

    async fn wait_for_acks(&mut self) -> Result<(), ClientError> {
        while self.unacked > 0 {
            self.next_event().await?;
        }
        Ok(())
    }

    async fn wait_for_suback(&mut self) -> Result<(), ClientError> {
        loop {
            if let Event::Incoming(Packet::SubAck(_)) = self.next_event().await? {
                return Ok(());
            }
        }
    }

    async fn wait_for_reply(
        &mut self,
        inbox: &str,
        correlation: &[u8],
    ) -> Result<Reply, ClientError> {
        loop {
            let Event::Incoming(Packet::Publish(publish)) = self.next_event().await? else {
                continue;
            };

            if &publish.topic[..] != inbox.as_bytes() {
                continue;
            }

            let correlated = publish
                .properties
                .as_ref()
                .and_then(|properties| properties.correlation_data.as_ref())
                .map_or(true, |data| &data[..] == correlation);
            if !correlated {
                tracing::debug!(inbox, "Ignoring reply for another request");
                continue;
            }

            return Ok(Reply {
                subject: String::from_utf8_lossy(&publish.topic).into_owned(),
                data: publish.payload.to_vec(),
            });
        }
    }

    /// Run `operation` against the flush deadline.
    async fn within_flush_timeout<T>(
        flush_timeout: Duration,
        operation: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        timeout(flush_timeout, operation)
            .await
            .map_err(|_| ClientError::Timeout(flush_timeout))?
    }

    /// Subscribe to the reply inbox on first use.
    ///
    /// Unbounded; callers run it under the request deadline.
    async fn reply_inbox(&mut self) -> Result<String, ClientError> {
        if let Some(inbox) = &self.inbox {
            return Ok(inbox.clone());
        }

        let inbox = format!("{INBOX_PREFIX}/{}", Uuid::new_v4().simple());

        self.client
            .subscribe(inbox.as_str(), QoS::AtMostOnce)
            .await
            .map_err(|e| ClientError::Subscribe(e.to_string()))?;
        self.wait_for_suback().await?;

        tracing::debug!(inbox, "Subscribed to reply inbox");

        self.inbox = Some(inbox.clone());
        Ok(inbox)
    }

    /// Subscribe to the inbox if needed, send the request and wait for its
    /// reply.
    async fn round_trip(&mut self, subject: &str, payload: &[u8]) -> Result<Reply, ClientError> {
        let inbox = self.reply_inbox().await?;
        let correlation = Uuid::new_v4();

        let properties = PublishProperties {
            response_topic: Some(inbox.clone()),
            correlation_data: Some(Bytes::copy_from_slice(correlation.as_bytes())),
            ..PublishProperties::default()
        };

        self.client
            .publish_with_properties(subject, QoS::AtLeastOnce, false, payload.to_vec(), properties)
            .await
            .map_err(|e| ClientError::Publish(e.to_string()))?;
        self.unacked += 1;

        tracing::debug!(subject, inbox, payload_len = payload.len(), "Sent request");

        self.wait_for_reply(&inbox, correlation.as_bytes()).await
    }
}

impl Transport for Connection {
    async fn publish(&mut self, subject: &str, payload: &[u8]) -> Result<(), ClientError> {
        self.client
            .publish(subject, QoS::AtLeastOnce, false, payload.to_vec())
            .await
            .map_err(|e| ClientError::Publish(e.to_string()))?;
        self.unacked += 1;

        Self::within_flush_timeout(self.flush_timeout, self.wait_for_written_publish()).await?;

        tracing::debug!(subject, payload_len = payload.len(), "Published message");
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ClientError> {
        tracing::debug!(unacked = self.unacked, "Flushing");
        Self::within_flush_timeout(self.flush_timeout, self.wait_for_acks()).await
    }

    async fn request(
        &mut self,
        subject: &str,
        payload: &[u8],
        wait: Duration,
    ) -> Result<Reply, ClientError> {
        timeout(wait, self.round_trip(subject, payload))
            .await
            .map_err(|_| ClientError::Timeout(wait))?
    }
}
