//! # mqtt-tools payload
//!
//! Turns a single command-line argument into the bytes of a message.
//!
//! ## Prefix directives
//!
//! | Prefix | Payload                                  |
//! |--------|------------------------------------------|
//! | `@`    | raw contents of the named file           |
//! | `hex:` | hex-decoded remainder                    |
//! | `b64:` | standard (padded) base64-decoded remainder |
//! | `a85:` | ascii85-decoded remainder                |
//! | none   | the argument's UTF-8 bytes, as text      |
//!
//! Prefixes are tested in that order and the first match wins.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ascii85;
pub mod resolve;

pub use ascii85::Ascii85Error;
pub use resolve::{resolve, Directive, Payload, PayloadError};
