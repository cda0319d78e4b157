//! Source document representation.

use crate::{Error, Result};
use std::fmt;

/// Supported document kinds, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// JPEG image, `.jpg` extension.
    Jpg,
    /// JPEG image, `.jpeg` extension.
    Jpeg,
    /// PNG image.
    Png,
    /// Multi-page PDF document.
    Pdf,
}

impl DocumentKind {
    /// Maps a file extension (without the dot, any case) to a kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unsupported extensions.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            other => Err(Error::InvalidInput(format!(
                "extension '{other}' is not supported"
            ))),
        }
    }

    /// Derives the kind from a file name's extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the name has no extension or the
    /// extension is unsupported.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        match file_name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => Self::from_extension(extension),
            _ => Err(Error::InvalidInput(format!(
                "no extension found for file '{file_name}'"
            ))),
        }
    }

    /// True for the single-page raster kinds.
    #[must_use]
    pub const fn is_image(self) -> bool {
        matches!(self, Self::Jpg | Self::Jpeg | Self::Png)
    }

    /// Canonical lowercase extension for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source document ready for redaction: fully materialized bytes plus the
/// declared kind and opaque correlation ids carried into logs.
#[derive(Debug, Clone)]
pub struct Document {
    /// Raw document bytes.
    pub bytes: Vec<u8>,
    /// Declared document kind.
    pub kind: DocumentKind,
    /// Correlation id of the owning case.
    pub case_id: String,
    /// Correlation id of the document within the case.
    pub doc_id: String,
}

impl Document {
    /// Creates a document, rejecting empty byte content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `bytes` is empty.
    pub fn new(
        bytes: Vec<u8>,
        kind: DocumentKind,
        case_id: impl Into<String>,
        doc_id: impl Into<String>,
    ) -> Result<Self> {
        let case_id = case_id.into();
        let doc_id = doc_id.into();
        if bytes.is_empty() {
            return Err(Error::InvalidInput(format!(
                "document is empty (case {case_id}, doc {doc_id})"
            )));
        }
        Ok(Self {
            bytes,
            kind,
            case_id,
            doc_id,
        })
    }
}
