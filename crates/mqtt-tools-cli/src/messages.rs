//! Message sources shared by both commands.

use anyhow::{Context, Result};
use mqtt_tools_payload::{resolve, Payload};
use std::io::Read;

/// Payloads to send, resolved lazily in argument order.
///
/// With no message arguments the whole of standard input is one binary
/// message. Resolution happens as the iterator advances, so a bad argument
/// only fails once the messages before it have been sent.
pub enum Messages<'a, R> {
    /// Resolve each command-line argument
    Args(std::slice::Iter<'a, String>),
    /// Read the reader to its end, once
    Stdin(Option<R>),
}

impl<'a, R: Read> Messages<'a, R> {
    /// Choose the source for `args`, falling back to `stdin`.
    pub fn new(args: &'a [String], stdin: R) -> Self {
        if args.is_empty() {
            Self::Stdin(Some(stdin))
        } else {
            Self::Args(args.iter())
        }
    }
}

impl<R: Read> Iterator for Messages<'_, R> {
    type Item = Result<Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Args(args) => args
                .next()
                .map(|arg| resolve(arg).with_context(|| format!("message {arg:?}"))),
            Self::Stdin(stdin) => stdin.take().map(read_all),
        }
    }
}

fn read_all(mut stdin: impl Read) -> Result<Payload> {
    let mut bytes = Vec::new();
    stdin
        .read_to_end(&mut bytes)
        .context("failed to read standard input")?;
    Ok(Payload::binary(bytes))
}
