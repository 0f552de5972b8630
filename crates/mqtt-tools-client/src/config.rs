//! Broker connection configuration.

use crate::address::{parse_server_list, BrokerAddr};
use crate::credentials::Credentials;
use crate::error::ClientError;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Server used when none is configured.
pub const DEFAULT_URL: &str = "tcp://localhost:1883";

/// Settings for [`Connection::connect`](crate::Connection::connect).
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Servers tried in order until one accepts the connection
    pub servers: Vec<BrokerAddr>,
    /// MQTT client identifier
    pub client_id: String,
    /// Optional login
    pub credentials: Option<Credentials>,
    /// Keep-alive interval
    pub keep_alive: Duration,
    /// Time allowed per server for the CONNACK to arrive
    pub connect_timeout: Duration,
    /// Time allowed for outstanding publish acknowledgements
    pub flush_timeout: Duration,
}

impl BrokerConfig {
    /// Create a configuration for `servers` with a unique client id derived
    /// from `client_name`.
    #[must_use]
    pub fn new(servers: Vec<BrokerAddr>, client_name: &str) -> Self {
        Self {
            servers,
            client_id: format!("{client_name}-{}", Uuid::new_v4().simple()),
            credentials: None,
            keep_alive: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(2),
            flush_timeout: Duration::from_secs(10),
        }
    }

    /// Build a configuration from a comma-separated URL list and an optional
    /// credential file.
    ///
    /// # Errors
    ///
    /// Returns error if a URL is invalid or the credential file cannot be
    /// loaded.
    pub fn from_urls(
        urls: &str,
        creds_path: Option<&Path>,
        client_name: &str,
    ) -> Result<Self, ClientError> {
        let mut config = Self::new(parse_server_list(urls)?, client_name);
        config.credentials = creds_path.map(Credentials::load).transpose()?;
        Ok(config)
    }
}
