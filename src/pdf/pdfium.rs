//! PDFium-backed engine

use crate::config::RasterizerConfig;
use crate::error::{Error, Result};
use crate::pdf::{has_pdf_header, PdfEngine, Viewport};
use crate::surface::DrawingSurface;
use pdfium_render::prelude::*;
use std::path::PathBuf;

/// Renders pages with PDFium.
///
/// PDFium is not thread-safe, so the library is bound on every call instead
/// of being stored here.
#[derive(Debug, Clone)]
pub struct PdfiumEngine {
    library_dirs: Vec<PathBuf>,
    render_annotations: bool,
    max_image_pixels: u64,
}

impl Default for PdfiumEngine {
    fn default() -> Self {
        Self::new(&RasterizerConfig::default())
    }
}

impl PdfiumEngine {
    pub fn new(config: &RasterizerConfig) -> Self {
        Self {
            library_dirs: config.pdfium_library_dirs.clone(),
            render_annotations: config.render_annotations,
            max_image_pixels: config.max_image_pixels,
        }
    }

    /// Bind PDFium from the configured directories, then `./`, then the system library
    fn create_pdfium(&self) -> Result<Pdfium> {
        let mut last_error = None;

        for dir in self
            .library_dirs
            .iter()
            .map(|d| d.as_path())
            .chain(std::iter::once(std::path::Path::new("./")))
        {
            match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)) {
                Ok(bindings) => return Ok(Pdfium::new(bindings)),
                Err(e) => last_error = Some(e),
            }
        }

        let bindings = Pdfium::bind_to_system_library().map_err(|e| Error::Pdfium {
            reason: format!(
                "Failed to initialize PDFium: {} (last path error: {})",
                e,
                last_error.map(|e| e.to_string()).unwrap_or_default()
            ),
        })?;

        Ok(Pdfium::new(bindings))
    }
}

/// Map PDFium errors to our error type
fn map_pdfium_error(err: PdfiumError) -> Error {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            Error::PasswordRequired
        }
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::FormatError) => {
            Error::InvalidPdf {
                reason: "Malformed PDF structure".to_string(),
            }
        }
        _ => Error::Pdfium {
            reason: format!("{}", err),
        },
    }
}

impl PdfEngine for PdfiumEngine {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn render_page(
        &self,
        data: &[u8],
        page_number: u16,
        scale: f32,
        surface: &mut dyn DrawingSurface,
    ) -> Result<Viewport> {
        if !has_pdf_header(data) {
            return Err(Error::InvalidPdf {
                reason: "Not a valid PDF file".to_string(),
            });
        }

        let pdfium = self.create_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(map_pdfium_error)?;

        let pages = document.pages();
        let page_count = pages.len();
        if page_number < 1 || page_number > page_count {
            return Err(Error::PageOutOfBounds {
                page: page_number as u32,
                total: page_count as u32,
            });
        }

        let page = pages.get(page_number - 1).map_err(|e| Error::Pdfium {
            reason: format!("Failed to get page {}: {}", page_number, e),
        })?;

        let viewport = Viewport::new(page.width().value, page.height().value, scale)?;
        viewport.check_pixel_budget(self.max_image_pixels)?;

        tracing::debug!(
            page = page_number,
            page_count,
            width = viewport.width,
            height = viewport.height,
            "rendering page with PDFium"
        );

        surface.resize(viewport.width, viewport.height);

        let config = PdfRenderConfig::new()
            .set_target_width(viewport.width as i32)
            .set_target_height(viewport.height as i32)
            .render_form_data(self.render_annotations)
            .render_annotations(self.render_annotations);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| Error::Pdfium {
                reason: format!("Failed to render page {}: {}", page_number, e),
            })?;

        surface.draw_image(&bitmap.as_image())?;

        Ok(viewport)
    }
}
