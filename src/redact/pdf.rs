//! PDF redaction: draw fills, then flatten every page to raster.

use crate::config::{ColorMode, RenderSettings};
use crate::models::{Document, RedactionSet};
use crate::redact::Redactor;
use crate::{Error, Result};
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// PDF user space resolution, in points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Redacts PDFs by drawing opaque fills onto each page's content and then
/// rebuilding the document from per-page raster renders.
///
/// The rebuilt document contains only the rendered images: the original
/// vector content, including anything underneath the fills, is discarded,
/// so the redaction cannot be reversed by extracting text or removing the
/// fill objects.
pub struct PdfRedactor {
    pdfium: Pdfium,
    settings: RenderSettings,
}

impl PdfRedactor {
    /// Binds the PDF runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderFailure`] when the pdfium library cannot be
    /// bound.
    pub fn new(settings: RenderSettings) -> Result<Self> {
        let bindings = Pdfium::bind_to_system_library().map_err(|error| Error::RenderFailure {
            operation: "binding the pdfium library".to_string(),
            cause: error.to_string(),
        })?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            settings,
        })
    }

    /// Draws the plan's rectangles as solid black fills onto each page.
    ///
    /// Normalized coordinates are top-left origin while PDF user space is
    /// bottom-left, so the vertical axis is inverted during scaling.
    fn draw_rectangles(
        &self,
        document: &PdfDocument<'_>,
        redactions: &RedactionSet,
    ) -> Result<()> {
        for (page_index, mut page) in document.pages().iter().enumerate() {
            let page_key = (page_index + 1).to_string();
            let Some(boxes) = redactions.boxes_for(&page_key) else {
                debug!(page = %page_key, "no bounding boxes provided for page, skipping");
                continue;
            };
            info!(page = %page_key, count = boxes.len(), "drawing rectangles");

            let page_width = f64::from(page.width().value);
            let page_height = f64::from(page.height().value);
            for bounding_box in boxes {
                let left = bounding_box.left * page_width;
                let bottom =
                    page_height * (1.0 - (bounding_box.top + bounding_box.height));
                let width = bounding_box.width * page_width;
                let height = bounding_box.height * page_height;

                #[allow(clippy::cast_possible_truncation)]
                let rect = PdfRect::new(
                    PdfPoints::new(bottom as f32),
                    PdfPoints::new(left as f32),
                    PdfPoints::new((bottom + height) as f32),
                    PdfPoints::new((left + width) as f32),
                );
                let fill = PdfPagePathObject::new_rect(
                    document,
                    rect,
                    None,
                    None,
                    Some(PdfColor::new(0, 0, 0, 255)),
                )
                .map_err(|error| render_error("creating fill rectangle", &error))?;
                page.objects_mut()
                    .add_path_object(fill)
                    .map_err(|error| render_error("drawing fill rectangle", &error))?;
            }
        }
        Ok(())
    }

    /// Renders every page to raster and assembles a brand-new document
    /// containing only those images.
    ///
    /// The rebuilt page's size in points equals the rendered bitmap's pixel
    /// dimensions, so the configured DPI also scales the output page size.
    #[allow(clippy::cast_precision_loss)]
    fn flatten(&self, source: &PdfDocument<'_>) -> Result<Vec<u8>> {
        let mut output = self
            .pdfium
            .create_new_pdf()
            .map_err(|error| render_error("creating output document", &error))?;

        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(self.settings.pdf_dpi as f32 / POINTS_PER_INCH);

        for page in source.pages().iter() {
            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|error| render_error("rasterizing page", &error))?;
            let rendered = match self.settings.color_mode {
                ColorMode::Rgb => bitmap.as_image(),
                ColorMode::Grayscale => DynamicImage::ImageLuma8(bitmap.as_image().to_luma8()),
            };

            let width = PdfPoints::new(rendered.width() as f32);
            let height = PdfPoints::new(rendered.height() as f32);
            let mut new_page = output
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::Custom(width, height))
                .map_err(|error| render_error("appending output page", &error))?;
            let image_object =
                PdfPageImageObject::new_with_size(&output, &rendered, width, height)
                    .map_err(|error| render_error("embedding page raster", &error))?;
            new_page
                .objects_mut()
                .add_image_object(image_object)
                .map_err(|error| render_error("embedding page raster", &error))?;
        }

        output
            .save_to_bytes()
            .map_err(|error| render_error("encoding output document", &error))
    }
}

impl Redactor for PdfRedactor {
    fn process_document(
        &self,
        document: &Document,
        redactions: &RedactionSet,
    ) -> Result<Vec<u8>> {
        let pdf = self
            .pdfium
            .load_pdf_from_byte_slice(&document.bytes, None)
            .map_err(|error| Error::CorruptDocument {
                kind: document.kind,
                cause: error.to_string(),
            })?;
        debug!(
            case = %document.case_id,
            doc = %document.doc_id,
            pages = pdf.pages().len(),
            dpi = self.settings.pdf_dpi,
            "redacting pdf"
        );
        self.draw_rectangles(&pdf, redactions)?;
        self.flatten(&pdf)
    }
}

fn render_error(operation: &str, error: &PdfiumError) -> Error {
    Error::RenderFailure {
        operation: operation.to_string(),
        cause: error.to_string(),
    }
}
