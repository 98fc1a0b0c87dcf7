//! First-page PDF to PNG conversion

use crate::config::RasterizerConfig;
use crate::error::{Error, Result};
use crate::file::{png_file_name, BinaryFile};
use crate::object_url::ObjectUrlRegistry;
use crate::pdf::{PdfEngine, PdfiumEngine, RENDER_SCALE};
use crate::surface::{ImageSurfaceProvider, SurfaceProvider};
use image::ImageFormat;
use serde::Serialize;
use std::sync::{Arc, OnceLock};

/// Outcome of a conversion.
///
/// Either `image_url` and `file` are set, or `error` is. On error the URL is
/// empty and there is no file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub image_url: String,
    pub file: Option<BinaryFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    fn success(image_url: String, file: BinaryFile) -> Self {
        Self {
            image_url,
            file: Some(file),
            error: None,
        }
    }

    fn failure(err: &Error) -> Self {
        Self {
            image_url: String::new(),
            file: None,
            error: Some(err.conversion_message()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Renders page 1 of a PDF to a PNG.
///
/// Built from an engine, an optional display capability and a URL registry.
/// Without a display the rasterizer refuses every call up front.
#[derive(Clone)]
pub struct PdfPageRasterizer {
    engine: Arc<dyn PdfEngine>,
    display: Option<Arc<dyn SurfaceProvider>>,
    urls: Arc<ObjectUrlRegistry>,
}

impl PdfPageRasterizer {
    pub fn new(
        engine: Arc<dyn PdfEngine>,
        display: Arc<dyn SurfaceProvider>,
        urls: Arc<ObjectUrlRegistry>,
    ) -> Self {
        Self {
            engine,
            display: Some(display),
            urls,
        }
    }

    /// A rasterizer with no drawing capability
    pub fn headless(engine: Arc<dyn PdfEngine>, urls: Arc<ObjectUrlRegistry>) -> Self {
        Self {
            engine,
            display: None,
            urls,
        }
    }

    /// PDFium engine drawing onto in-memory surfaces
    pub fn with_config(config: &RasterizerConfig) -> Self {
        Self::new(
            Arc::new(PdfiumEngine::new(config)),
            Arc::new(ImageSurfaceProvider),
            Arc::new(ObjectUrlRegistry::new(config.url_origin.clone())),
        )
    }

    /// Registry holding the URLs this rasterizer hands out
    pub fn object_urls(&self) -> &Arc<ObjectUrlRegistry> {
        &self.urls
    }

    pub fn supports_rendering(&self) -> bool {
        self.display.is_some()
    }

    /// Convert the first page of `document` to a PNG
    pub async fn convert(&self, document: &BinaryFile) -> ConversionResult {
        match self.try_convert(document).await {
            Ok((image_url, file)) => ConversionResult::success(image_url, file),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    file = %document.name(),
                    "convert_pdf_to_image failed"
                );
                ConversionResult::failure(&e)
            }
        }
    }

    async fn try_convert(&self, document: &BinaryFile) -> Result<(String, BinaryFile)> {
        let display = self.display.clone().ok_or(Error::UnsupportedEnvironment)?;

        let data = document.read_bytes().await?;
        tracing::debug!(
            file = %document.name(),
            bytes = data.len(),
            engine = self.engine.name(),
            "converting first page"
        );

        let engine = self.engine.clone();
        let (viewport, blob) = tokio::task::spawn_blocking(move || {
            let mut surface = display.create_surface();
            let viewport = engine.render_page(&data, 1, RENDER_SCALE, surface.as_mut())?;
            let blob = surface.to_blob(ImageFormat::Png)?;
            Ok::<_, Error>((viewport, blob))
        })
        .await
        .map_err(|e| Error::Render {
            reason: format!("Task join error: {}", e),
        })??;

        let blob = blob.ok_or(Error::EmptyImage)?;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            png_bytes = blob.len(),
            "encoded first page"
        );

        let file = BinaryFile::from_blob(&blob, png_file_name(document.name()));
        let image_url = self.urls.create_object_url(blob);

        Ok((image_url, file))
    }
}

fn default_rasterizer() -> &'static PdfPageRasterizer {
    static DEFAULT: OnceLock<PdfPageRasterizer> = OnceLock::new();
    DEFAULT.get_or_init(|| PdfPageRasterizer::with_config(&RasterizerConfig::from_env()))
}

/// Convert with the process-wide default rasterizer (PDFium, in-memory surface)
pub async fn convert_pdf_to_image(document: &BinaryFile) -> ConversionResult {
    default_rasterizer().convert(document).await
}

/// Registry backing URLs returned by [`convert_pdf_to_image`]
pub fn default_object_urls() -> &'static Arc<ObjectUrlRegistry> {
    default_rasterizer().object_urls()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EMPTY_IMAGE_MESSAGE, UNSUPPORTED_ENVIRONMENT_MESSAGE};
    use crate::file::{PDF_MIME_TYPE, PNG_MIME_TYPE};
    use crate::pdf::{has_pdf_header, Viewport};
    use crate::surface::DrawingSurface;
    use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Paints each page a flat colour derived from its number
    #[derive(Default)]
    struct FlatEngine {
        calls: AtomicUsize,
        pages_requested: Mutex<Vec<u16>>,
    }

    impl PdfEngine for FlatEngine {
        fn name(&self) -> &'static str {
            "flat"
        }

        fn render_page(
            &self,
            data: &[u8],
            page_number: u16,
            scale: f32,
            surface: &mut dyn DrawingSurface,
        ) -> Result<Viewport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages_requested.lock().unwrap().push(page_number);
            if !has_pdf_header(data) {
                return Err(Error::InvalidPdf {
                    reason: "Not a valid PDF file".to_string(),
                });
            }
            let viewport = Viewport::new(200.0, 100.0, scale)?;
            surface.resize(viewport.width, viewport.height);
            let shade = (page_number as u8).wrapping_mul(40);
            let page = RgbaImage::from_pixel(
                viewport.width,
                viewport.height,
                Rgba([shade, 0, 0, 255]),
            );
            surface.draw_image(&DynamicImage::ImageRgba8(page))?;
            Ok(viewport)
        }
    }

    /// Never resizes, so the surface stays empty
    struct BlankEngine;

    impl PdfEngine for BlankEngine {
        fn name(&self) -> &'static str {
            "blank"
        }

        fn render_page(
            &self,
            _data: &[u8],
            _page_number: u16,
            scale: f32,
            _surface: &mut dyn DrawingSurface,
        ) -> Result<Viewport> {
            Viewport::new(1.0, 1.0, scale)
        }
    }

    struct PanickingEngine;

    impl PdfEngine for PanickingEngine {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn render_page(
            &self,
            _data: &[u8],
            _page_number: u16,
            _scale: f32,
            _surface: &mut dyn DrawingSurface,
        ) -> Result<Viewport> {
            panic!("renderer crashed")
        }
    }

    fn rasterizer(engine: Arc<dyn PdfEngine>) -> PdfPageRasterizer {
        PdfPageRasterizer::new(
            engine,
            Arc::new(ImageSurfaceProvider),
            Arc::new(ObjectUrlRegistry::default()),
        )
    }

    fn pdf(name: &str) -> BinaryFile {
        BinaryFile::new(b"%PDF-1.7\n%fake".to_vec(), name, PDF_MIME_TYPE)
    }

    #[tokio::test]
    async fn test_convert_success() {
        let engine = Arc::new(FlatEngine::default());
        let rasterizer = rasterizer(engine.clone());

        let result = rasterizer.convert(&pdf("Report.PDF")).await;

        assert!(result.is_success());
        assert!(result.error.is_none());
        assert!(result.image_url.starts_with("blob:pdf2img/"));

        let file = result.file.unwrap();
        assert_eq!(file.name(), "Report.png");
        assert_eq!(file.mime_type(), PNG_MIME_TYPE);

        let image = image::load_from_memory(file.bytes()).unwrap();
        assert_eq!(image.dimensions(), (600, 300));

        let blob = rasterizer.object_urls().resolve(&result.image_url).unwrap();
        assert_eq!(blob.data(), file.bytes());
    }

    #[tokio::test]
    async fn test_only_first_page_rendered() {
        let engine = Arc::new(FlatEngine::default());
        let rasterizer = rasterizer(engine.clone());

        let result = rasterizer.convert(&pdf("five-pages.pdf")).await;
        assert!(result.is_success());
        assert_eq!(*engine.pages_requested.lock().unwrap(), vec![1]);

        let image = image::load_from_memory(result.file.unwrap().bytes()).unwrap();
        assert_eq!(image.to_rgba8().get_pixel(0, 0), &Rgba([40, 0, 0, 255]));
    }

    #[tokio::test]
    async fn test_headless_skips_decode() {
        let engine = Arc::new(FlatEngine::default());
        let rasterizer =
            PdfPageRasterizer::headless(engine.clone(), Arc::new(ObjectUrlRegistry::default()));
        assert!(!rasterizer.supports_rendering());

        let result = rasterizer.convert(&pdf("doc.pdf")).await;

        assert_eq!(result.error.as_deref(), Some(UNSUPPORTED_ENVIRONMENT_MESSAGE));
        assert_eq!(result.image_url, "");
        assert!(result.file.is_none());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
        assert!(rasterizer.object_urls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_bytes_yield_error() {
        let rasterizer = rasterizer(Arc::new(FlatEngine::default()));
        let garbage = BinaryFile::new(b"hello world".to_vec(), "bad.pdf", PDF_MIME_TYPE);

        let result = rasterizer.convert(&garbage).await;

        let error = result.error.unwrap();
        assert!(error.starts_with("Failed to convert PDF: "));
        assert!(error.contains("Invalid PDF file"));
        assert_eq!(result.image_url, "");
        assert!(result.file.is_none());
        assert!(rasterizer.object_urls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_blob_yields_fixed_error() {
        let rasterizer = rasterizer(Arc::new(BlankEngine));

        let result = rasterizer.convert(&pdf("empty.pdf")).await;

        assert_eq!(result.error.as_deref(), Some(EMPTY_IMAGE_MESSAGE));
        assert!(result.file.is_none());
        assert_eq!(result.image_url, "");
    }

    #[tokio::test]
    async fn test_engine_panic_is_caught() {
        let rasterizer = rasterizer(Arc::new(PanickingEngine));

        let result = rasterizer.convert(&pdf("crash.pdf")).await;

        let error = result.error.unwrap();
        assert!(error.starts_with("Failed to convert PDF: Render error: Task join error"));
        assert!(!error.contains("PDFium"));
        assert!(result.file.is_none());
    }

    #[tokio::test]
    async fn test_repeat_conversion_is_independent() {
        let rasterizer = rasterizer(Arc::new(FlatEngine::default()));
        let document = pdf("same.pdf");

        let first = rasterizer.convert(&document).await;
        let second = rasterizer.convert(&document).await;

        assert_ne!(first.image_url, second.image_url);
        assert_eq!(
            first.file.unwrap().bytes(),
            second.file.unwrap().bytes()
        );
        assert_eq!(rasterizer.object_urls().len(), 2);
    }

    #[test]
    fn test_result_serialization() {
        let ok = ConversionResult::success(
            "blob:pdf2img/x".to_string(),
            BinaryFile::new(vec![1], "a.png", PNG_MIME_TYPE),
        );
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["imageUrl"], "blob:pdf2img/x");
        assert_eq!(json["file"]["name"], "a.png");
        assert!(json.get("error").is_none());

        let failed = ConversionResult::failure(&Error::UnsupportedEnvironment);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["imageUrl"], "");
        assert!(json["file"].is_null());
        assert_eq!(json["error"], UNSUPPORTED_ENVIRONMENT_MESSAGE);
    }

    #[test]
    fn test_convert_outside_async_context() {
        let rasterizer = rasterizer(Arc::new(FlatEngine::default()));
        let result = tokio_test::block_on(rasterizer.convert(&pdf("sync.pdf")));
        assert!(result.is_success());
        assert_eq!(result.file.unwrap().name(), "sync.png");
    }
}
