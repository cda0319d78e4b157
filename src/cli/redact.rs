//! Document redaction CLI command.

use crate::config::RenderSettings;
use crate::models::{Document, DocumentKind, RedactionRequest};
use crate::observability::{WorkflowOutcome, record_document_redacted};
use crate::redact::RedactorCache;
use crate::services::aggregate;
use crate::{Error, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::FileInferenceSource;

/// Arguments for `blackout redact`.
#[derive(Debug, Args)]
pub struct RedactArgs {
    /// Source document (`.jpg`, `.jpeg`, `.png`, or `.pdf`).
    pub input: PathBuf,

    /// Redaction request JSON: `{"phrases": [...], "entities": {...}}`.
    #[arg(short, long)]
    pub request: PathBuf,

    /// OCR text-detection JSON (needed for phrase redaction).
    #[arg(long)]
    pub ocr: Option<PathBuf>,

    /// Directory holding `<source>-locations.json` inference artifacts.
    #[arg(long)]
    pub locations: Option<PathBuf>,

    /// Output path for the redacted document.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Aggregates the request and burns it into the document, recording the
/// workflow outcome.
pub fn cmd_redact(args: &RedactArgs, settings: RenderSettings) -> Result<()> {
    let result = run(args, settings);
    match &result {
        Ok(()) => record_document_redacted(WorkflowOutcome::Success),
        Err(_) => record_document_redacted(WorkflowOutcome::Failure),
    }
    result
}

fn run(args: &RedactArgs, settings: RenderSettings) -> Result<()> {
    let document = load_document(&args.input)?;
    let request = load_request(&args.request)?;

    let source = FileInferenceSource::new(args.ocr.clone(), args.locations.clone());
    let plan = aggregate(&request, &source)?;
    info!(
        pages = plan.page_count(),
        boxes = plan.total_boxes(),
        "aggregated redaction plan"
    );
    for (page, boxes) in plan.iter() {
        debug!(page, count = boxes.len(), "planned rectangles");
    }

    let mut cache = RedactorCache::new(settings);
    let output = cache
        .redactor_for(document.kind)?
        .process_document(&document, &plan)?;

    std::fs::write(&args.output, &output).map_err(|error| Error::RenderFailure {
        operation: "writing output document".to_string(),
        cause: format!("{}: {error}", args.output.display()),
    })?;
    info!(
        output = %args.output.display(),
        bytes = output.len(),
        "wrote redacted document"
    );
    Ok(())
}

fn load_document(path: &Path) -> Result<Document> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("no file name in {}", path.display())))?;
    let kind = DocumentKind::from_file_name(file_name)?;
    let bytes = std::fs::read(path).map_err(|error| {
        Error::InvalidInput(format!("cannot read {}: {error}", path.display()))
    })?;
    Document::new(bytes, kind, "local", file_name)
}

fn load_request(path: &Path) -> Result<RedactionRequest> {
    let bytes = std::fs::read(path).map_err(|error| {
        Error::InvalidInput(format!("cannot read {}: {error}", path.display()))
    })?;
    serde_json::from_slice(&bytes).map_err(|error| {
        Error::InvalidInput(format!("cannot parse {}: {error}", path.display()))
    })
}
