//! Observability and telemetry.
//!
//! Structured logging through `tracing` with an env-filter, plus optional
//! Prometheus metrics. Logging goes to stderr so redacted output bytes on
//! stdout stay clean.

mod metrics;

pub use metrics::{
    WorkflowOutcome, install_prometheus, record_document_redacted, record_phrase_occurrences,
};

use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Plain,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format string. Unrecognized values fall back to plain.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Plain,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set; otherwise `blackout=info`, or
/// `blackout=debug` with `verbose`. Repeated initialization (as happens in
/// tests) is silently ignored.
pub fn init_tracing(verbose: bool, format: LogFormat) {
    let default_directive = if verbose { "blackout=debug" } else { "blackout=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Plain => subscriber.try_init(),
        LogFormat::Json => subscriber.json().try_init(),
    };
}
