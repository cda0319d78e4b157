//! Prometheus metrics.
//!
//! Counter names mirror the redaction-workflow metrics the hosting pipeline
//! tracks: documents redacted by outcome, and phrase occurrences located.

use crate::config::MetricsSettings;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::warn;

/// Documents processed by the redaction workflow, labeled by outcome.
const REDACTION_WORKFLOW: &str = "blackout_redaction_workflow_total";

/// Phrase occurrences located across all searches.
const PHRASE_OCCURRENCES: &str = "blackout_phrase_occurrences_total";

/// Terminal outcome of one document-redaction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Redacted output was produced.
    Success,
    /// The request aborted with a fatal error.
    Failure,
}

impl WorkflowOutcome {
    /// The outcome's metric label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Installs the Prometheus recorder with an HTTP listener, when enabled.
///
/// Returns whether a recorder was installed. Installation failure (for
/// example a port already in use) is logged and tolerated: redaction runs
/// fine without metrics.
pub fn install_prometheus(settings: &MetricsSettings) -> bool {
    if !settings.enabled {
        return false;
    }
    let listen_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), settings.port);
    match PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .install()
    {
        Ok(()) => true,
        Err(error) => {
            warn!(%error, "failed to install the metrics recorder, continuing without metrics");
            false
        }
    }
}

/// Records the terminal outcome of one document-redaction request.
pub fn record_document_redacted(outcome: WorkflowOutcome) {
    counter!(REDACTION_WORKFLOW, "outcome" => outcome.as_str()).increment(1);
}

/// Records located phrase occurrences.
pub fn record_phrase_occurrences(count: u64) {
    counter!(PHRASE_OCCURRENCES).increment(count);
}
