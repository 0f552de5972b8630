//! Environment-backed settings.
//!
//! Precedence is flag, then environment, then built-in default.

use crate::args::{Options, Tool};
use mqtt_tools_client::{BrokerConfig, ClientError, DEFAULT_URL};
use std::path::PathBuf;

/// Environment variable supplying the default `-s` value.
pub const SERVER_ENV: &str = "MQTT_TOOLS_SERVER";
/// Environment variable supplying the default `-creds` value.
pub const CREDS_ENV: &str = "MQTT_TOOLS_CREDS";

/// Connection settings after merging flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Comma-separated broker URLs
    pub servers: String,
    /// Optional credential file
    pub creds: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            servers: DEFAULT_URL.to_string(),
            creds: None,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `MQTT_TOOLS_SERVER`: broker URLs
    /// - `MQTT_TOOLS_CREDS`: credential file path
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which maps variable names to values.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(servers) = lookup(SERVER_ENV).filter(|value| !value.trim().is_empty()) {
            settings.servers = servers;
        }

        if let Some(creds) = lookup(CREDS_ENV).filter(|value| !value.is_empty()) {
            settings.creds = Some(PathBuf::from(creds));
        }

        settings
    }

    /// Apply command-line flags on top of these settings.
    #[must_use]
    pub fn with_flags(mut self, options: &Options) -> Self {
        if let Some(servers) = &options.servers {
            self.servers.clone_from(servers);
        }
        if let Some(creds) = &options.creds {
            self.creds = Some(creds.clone());
        }
        self
    }

    /// Build the broker configuration for `tool`.
    ///
    /// # Errors
    ///
    /// Returns error if a server URL is invalid or the credential file
    /// cannot be loaded.
    pub fn broker_config(&self, tool: Tool) -> Result<BrokerConfig, ClientError> {
        BrokerConfig::from_urls(&self.servers, self.creds.as_deref(), tool.name())
    }
}
