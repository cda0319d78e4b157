//! Format-specific redactors.
//!
//! A redactor burns a [`RedactionSet`] into a document and returns
//! flattened output bytes. The covered content is removed from the output
//! encoding itself, not merely hidden behind an annotation.

mod image;
mod pdf;

pub use image::ImageRedactor;
pub use pdf::PdfRedactor;

use crate::config::RenderSettings;
use crate::models::{Document, DocumentKind, RedactionSet};
use crate::{Error, Result};

/// Applies a redaction plan to a document, producing flattened output.
///
/// Implementations hold no per-document state: an instance may be reused
/// across many sequential calls, but carries no synchronization for
/// concurrent use. Callers invoking one instance from multiple threads must
/// add external mutual exclusion or construct per-call instances.
pub trait Redactor {
    /// Blanks the plan's rectangles onto the document and re-encodes it so
    /// the covered content cannot be recovered from the output.
    ///
    /// A page without an entry in the plan is rendered unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::CorruptDocument`] when the source bytes fail to decode.
    /// - [`Error::RenderFailure`] when drawing or re-encoding fails.
    fn process_document(&self, document: &Document, redactions: &RedactionSet)
    -> Result<Vec<u8>>;
}

/// Lazily-constructed redactors, at most one instance per document kind.
///
/// Long-lived hosting processes keep one cache and reuse redactors across
/// requests; construction happens on first use for a kind. Access goes
/// through `&mut self`, so the cache itself enforces the sequential-use
/// contract of [`Redactor`].
pub struct RedactorCache {
    settings: RenderSettings,
    image: Option<ImageRedactor>,
    pdf: Option<PdfRedactor>,
}

impl RedactorCache {
    /// Creates an empty cache; no redactor is constructed until first use.
    #[must_use]
    pub const fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            image: None,
            pdf: None,
        }
    }

    /// Returns the redactor for a document kind, constructing it on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderFailure`] when the PDF runtime cannot be
    /// bound.
    pub fn redactor_for(&mut self, kind: DocumentKind) -> Result<&dyn Redactor> {
        if kind.is_image() {
            return Ok(self.image.get_or_insert_with(ImageRedactor::new));
        }
        if self.pdf.is_none() {
            self.pdf = Some(PdfRedactor::new(self.settings)?);
        }
        self.pdf
            .as_ref()
            .map(|redactor| redactor as &dyn Redactor)
            .ok_or_else(|| Error::RenderFailure {
                operation: "pdf redactor construction".to_string(),
                cause: "instance unavailable".to_string(),
            })
    }
}
