//! Raster image redaction.

use crate::models::{Document, DocumentKind, RedactionSet};
use crate::redact::Redactor;
use crate::{Error, Result};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, Rgba};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::io::Cursor;
use tracing::{debug, warn};

/// Key under which rectangles for a single-page image are recorded.
const IMAGE_PAGE_KEY: &str = "1";

/// Redacts single-page raster images by filling rectangles directly on the
/// pixel grid and re-encoding in the original format.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRedactor;

impl ImageRedactor {
    /// Creates an image redactor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes the image, applying the orientation its embedded metadata
    /// declares.
    ///
    /// Images from many sources are stored in the camera sensor's
    /// orientation and tagged with the intended viewing transform; the tag
    /// covers the eight standard cases (identity, flips, rotations, and
    /// rotate+flip combinations). Missing or unreadable metadata is
    /// non-fatal: the image is used as stored.
    fn load_with_orientation(document: &Document) -> Result<DynamicImage> {
        let corrupt = |cause: String| Error::CorruptDocument {
            kind: document.kind,
            cause,
        };
        let reader = ImageReader::new(Cursor::new(document.bytes.as_slice()))
            .with_guessed_format()
            .map_err(|error| corrupt(error.to_string()))?;
        let mut decoder = reader
            .into_decoder()
            .map_err(|error| corrupt(error.to_string()))?;
        let orientation = match decoder.orientation() {
            Ok(orientation) => orientation,
            Err(error) => {
                warn!(
                    case = %document.case_id,
                    doc = %document.doc_id,
                    %error,
                    "failed to read orientation metadata, continuing without correction"
                );
                Orientation::NoTransforms
            }
        };
        let mut image =
            DynamicImage::from_decoder(decoder).map_err(|error| corrupt(error.to_string()))?;
        image.apply_orientation(orientation);
        Ok(image)
    }

    /// Re-encodes the redacted raster in the document's original format.
    fn encode(image: &DynamicImage, kind: DocumentKind) -> Result<Vec<u8>> {
        let mut output = Cursor::new(Vec::new());
        let encoded = match kind {
            DocumentKind::Png => image.write_to(&mut output, ImageFormat::Png),
            DocumentKind::Jpg | DocumentKind::Jpeg => {
                // JPEG carries no alpha channel.
                DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut output, ImageFormat::Jpeg)
            }
            DocumentKind::Pdf => {
                return Err(Error::InvalidInput(
                    "pdf document handed to the image redactor".to_string(),
                ));
            }
        };
        encoded.map_err(|error| Error::RenderFailure {
            operation: "image re-encoding".to_string(),
            cause: error.to_string(),
        })?;
        Ok(output.into_inner())
    }
}

impl Redactor for ImageRedactor {
    #[allow(clippy::cast_possible_truncation)]
    fn process_document(
        &self,
        document: &Document,
        redactions: &RedactionSet,
    ) -> Result<Vec<u8>> {
        let mut image = Self::load_with_orientation(document)?;

        // An image is always a single page.
        let boxes = redactions.boxes_for(IMAGE_PAGE_KEY).unwrap_or(&[]);
        debug!(
            case = %document.case_id,
            doc = %document.doc_id,
            count = boxes.len(),
            "redacting image"
        );

        let page_width = f64::from(image.width());
        let page_height = f64::from(image.height());
        for bounding_box in boxes {
            let width = (bounding_box.width * page_width).round() as u32;
            let height = (bounding_box.height * page_height).round() as u32;
            if width == 0 || height == 0 {
                continue;
            }
            let x = (bounding_box.left * page_width).round() as i32;
            let y = (bounding_box.top * page_height).round() as i32;
            draw_filled_rect_mut(
                &mut image,
                Rect::at(x, y).of_size(width, height),
                Rgba([0, 0, 0, 255]),
            );
        }

        Self::encode(&image, document.kind)
    }
}
