//! Send-side abstraction used by the command flows.

use crate::error::ClientError;
use std::time::Duration;

/// The single message received in answer to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Topic the reply arrived on
    pub subject: String,
    /// Reply payload
    pub data: Vec<u8>,
}

/// Operations the publish and request commands need from a broker.
///
/// Implemented by [`Connection`](crate::Connection); tests substitute an
/// in-memory recorder.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Publish `payload` on `subject`.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be handed to the broker.
    async fn publish(&mut self, subject: &str, payload: &[u8]) -> Result<(), ClientError>;

    /// Wait until every published message has been acknowledged.
    ///
    /// # Errors
    ///
    /// Returns error if the connection fails or acknowledgements are late.
    async fn flush(&mut self) -> Result<(), ClientError>;

    /// Publish `payload` on `subject` and wait up to `timeout` for one reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] if no reply arrives in time.
    async fn request(
        &mut self,
        subject: &str,
        payload: &[u8],
        timeout: Duration,
    ) -> Result<Reply, ClientError>;
}
