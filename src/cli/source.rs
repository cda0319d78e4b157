//! Disk-backed inference source.

use crate::models::{EntityLocations, OcrPage};
use crate::services::InferenceSource;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// An [`InferenceSource`] over inference artifacts on the local filesystem.
///
/// The OCR file holds the text-detection result for the whole document;
/// entity locations are read from `<dir>/<name>-locations.json`. Either
/// path may be absent, in which case the corresponding artifact reports
/// [`Error::SourceUnavailable`] and aggregation skips that source.
#[derive(Debug, Clone, Default)]
pub struct FileInferenceSource {
    ocr_path: Option<PathBuf>,
    locations_dir: Option<PathBuf>,
}

impl FileInferenceSource {
    /// Creates a source over the given OCR file and locations directory.
    #[must_use]
    pub const fn new(ocr_path: Option<PathBuf>, locations_dir: Option<PathBuf>) -> Self {
        Self {
            ocr_path,
            locations_dir,
        }
    }
}

impl InferenceSource for FileInferenceSource {
    fn ocr_pages(&self) -> Result<Vec<OcrPage>> {
        let path = self
            .ocr_path
            .as_ref()
            .ok_or_else(|| unavailable("text-detection", "no OCR file was provided"))?;
        let bytes = read_artifact(path, "text-detection")?;
        parse_ocr_pages(&bytes)
            .map_err(|error| unavailable("text-detection", &error.to_string()))
    }

    fn entity_locations(&self, name: &str) -> Result<EntityLocations> {
        let dir = self
            .locations_dir
            .as_ref()
            .ok_or_else(|| unavailable(name, "no locations directory was provided"))?;
        let path = dir.join(format!("{name}-locations.json"));
        let bytes = read_artifact(&path, name)?;
        serde_json::from_slice(&bytes).map_err(|error| unavailable(name, &error.to_string()))
    }
}

/// Parses a text-detection artifact: a JSON array of per-page results, or a
/// single page object for one-page documents.
pub(crate) fn parse_ocr_pages(bytes: &[u8]) -> serde_json::Result<Vec<OcrPage>> {
    serde_json::from_slice::<Vec<OcrPage>>(bytes)
        .or_else(|_| serde_json::from_slice::<OcrPage>(bytes).map(|page| vec![page]))
}

fn read_artifact(path: &Path, source: &str) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|error| {
        unavailable(source, &format!("cannot read {}: {error}", path.display()))
    })
}

fn unavailable(source: &str, cause: &str) -> Error {
    Error::SourceUnavailable {
        source_name: source.to_string(),
        cause: cause.to_string(),
    }
}
