//! Client error type.

use std::time::Duration;

/// Errors that can occur while talking to the broker.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Broker URL could not be parsed
    #[error("invalid broker URL: {0}")]
    InvalidUrl(String),
    /// Credential file could not be loaded
    #[error("credentials error: {0}")]
    Credentials(String),
    /// Connection failed, was refused or dropped
    #[error("connection error: {0}")]
    Connection(String),
    /// Publish could not be queued
    #[error("publish error: {0}")]
    Publish(String),
    /// Reply inbox subscription failed
    #[error("subscription error: {0}")]
    Subscribe(String),
    /// No answer from the broker or a responder in time
    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

impl ClientError {
    /// True if the error is a deadline expiry.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
