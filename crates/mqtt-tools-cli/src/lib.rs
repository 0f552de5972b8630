//! # mqtt-tools CLI
//!
//! Shared pieces of the `mqtt-pub` and `mqtt-req` binaries: flag parsing,
//! environment settings, logging and the two command flows.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod config;
pub mod logging;
pub mod messages;
pub mod publish;
pub mod request;

pub use args::{parse_args, Invocation, Options, Tool, UsageError};
pub use config::Settings;
