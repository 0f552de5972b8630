//! Logging setup shared by both binaries.

use std::io::IsTerminal;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// Reads `RUST_LOG` (default `info`). Lines go to stderr, colored only when
/// stderr is a terminal.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let ansi = std::io::stderr().is_terminal();
    let _ = subscriber(env_filter(), std::io::stderr, ansi).try_init();
}

/// `RUST_LOG`, or `info` when unset or unparsable.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build the formatting subscriber used by the binaries.
///
/// No timestamp, level or target is printed, so an info event reads
/// exactly as its message.
#[must_use]
pub fn subscriber<W>(filter: EnvFilter, writer: W, ansi: bool) -> impl Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .without_time()
        .with_level(false)
        .with_target(false)
        .finish()
}
