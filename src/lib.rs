//! # Blackout
//!
//! Permanent, raster-backed document redaction.
//!
//! Blackout locates redaction targets inside previously OCR-processed
//! documents and obliterates them in the rendered output. Phrase targets are
//! resolved to word-level rectangles through an offset index built over the
//! OCR line blocks; entity targets arrive as precomputed rectangle sets from
//! an upstream detection step. Both are merged into a per-page redaction
//! plan and burned into the document by a format-specific redactor that
//! flattens the result to raster, so the blanked content cannot be recovered
//! from the output file.
//!
//! ## Features
//!
//! - Cross-line literal phrase location over word-level OCR geometry
//! - Deterministic aggregation of phrase- and entity-derived rectangles
//! - Image redaction with EXIF orientation correction
//! - PDF redaction that rasterizes every page, discarding vector content
//!
//! ## Example
//!
//! ```rust,ignore
//! use blackout::redact::{Redactor, RedactorCache};
//! use blackout::services::aggregate;
//!
//! let plan = aggregate(&request, &source)?;
//! let mut cache = RedactorCache::new(settings);
//! let output = cache.redactor_for(document.kind)?.process_document(&document, &plan)?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod redact;
pub mod services;

// Re-exports for convenience
pub use config::{ColorMode, Config, RenderSettings};
pub use models::{
    Block, BlockType, BoundingBox, Document, DocumentKind, EntityDetail, EntityLocations, OcrPage,
    PhraseRequest, RedactionRequest, RedactionSet,
};
pub use redact::{ImageRedactor, PdfRedactor, Redactor, RedactorCache};
pub use services::{InferenceSource, InMemorySource, PhraseFinder, TextIndex, aggregate};

/// Error type for blackout operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed phrase/entity request structure, unsupported document kind |
/// | `OutOfRange` | Page index beyond the available OCR pages |
/// | `SourceUnavailable` | An inference source could not be retrieved or parsed |
/// | `CorruptDocument` | Source image/PDF bytes fail to decode |
/// | `RenderFailure` | Drawing, rasterizing, or re-encoding fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A phrase to locate is empty
    /// - A document carries an unsupported file extension
    /// - Request JSON fails to deserialize into the expected shape
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A page index fell outside the available pages.
    ///
    /// Non-fatal at per-page granularity inside aggregation and phrase
    /// search; surfaced to the caller only when the primary target is
    /// invalid.
    #[error("page index {index} out of range ({len} pages available)")]
    OutOfRange {
        /// The 0-based page index that was requested.
        index: usize,
        /// The number of pages actually available.
        len: usize,
    },

    /// An individual inference source could not be retrieved or parsed.
    ///
    /// Always non-fatal during aggregation: the source is skipped with a
    /// warning and the remaining sources still contribute.
    #[error("inference source '{source_name}' unavailable: {cause}")]
    SourceUnavailable {
        /// Name of the inference source (e.g. `entity-standard`).
        source_name: String,
        /// The underlying cause.
        cause: String,
    },

    /// The source document bytes failed to decode.
    ///
    /// Fatal: a document that cannot be read cannot be redacted, and the
    /// request must fail rather than return unprocessed content.
    #[error("corrupt {kind} document: {cause}")]
    CorruptDocument {
        /// The declared document kind.
        kind: models::DocumentKind,
        /// The underlying decode error.
        cause: String,
    },

    /// Drawing, rasterizing, or re-encoding the output failed.
    ///
    /// Fatal: a partially redacted document must never be returned as if it
    /// were successfully processed.
    #[error("render failure during {operation}: {cause}")]
    RenderFailure {
        /// The rendering stage that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for blackout operations.
pub type Result<T> = std::result::Result<T, Error>;
