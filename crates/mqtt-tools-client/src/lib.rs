//! # mqtt-tools client
//!
//! Thin, sequential glue over `rumqttc` for one-shot command-line tools.
//!
//! - [`parse_server_list`] turns `-s` style URL lists into broker addresses
//! - [`Credentials`] loads a username/password file
//! - [`Connection`] connects with failover and drives the MQTT event loop
//!   inline for publish, flush and request/reply
//! - [`Transport`] is the seam the command flows are written against
//!
//! Request/reply uses MQTT v5 response-topic and correlation-data properties.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod config;
pub mod connection;
pub mod credentials;
pub mod error;
pub mod transport;

pub use address::{parse_broker_url, parse_server_list, BrokerAddr};
pub use config::{BrokerConfig, DEFAULT_URL};
pub use connection::Connection;
pub use credentials::Credentials;
pub use error::ClientError;
pub use transport::{Reply, Transport};
