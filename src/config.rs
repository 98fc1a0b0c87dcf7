//! Rasterizer configuration

use std::path::PathBuf;

/// Environment variable holding extra PDFium library directories
pub const PDFIUM_DIR_ENV: &str = "PDF2IMG_PDFIUM_DIR";

/// Environment variable overriding the pixel budget
pub const MAX_PIXELS_ENV: &str = "PDF2IMG_MAX_PIXELS";

/// Configuration for [`crate::PdfPageRasterizer`] and [`crate::PdfiumEngine`]
#[derive(Debug, Clone)]
pub struct RasterizerConfig {
    /// Directories searched for the PDFium shared library, before `./` and the system library
    pub pdfium_library_dirs: Vec<PathBuf>,
    /// Origin embedded in object URLs (`blob:<origin>/<uuid>`)
    pub url_origin: String,
    /// Maximum total pixel area of a rendered page (default: 100_000_000)
    pub max_image_pixels: u64,
    /// Render annotations and form widgets along with page content (default: true)
    pub render_annotations: bool,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            pdfium_library_dirs: vec![PathBuf::from("/opt/pdfium/lib")],
            url_origin: "pdf2img".to_string(),
            max_image_pixels: 100_000_000,
            render_annotations: true,
        }
    }
}

impl RasterizerConfig {
    /// Build a config from defaults overridden by environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dirs) = lookup(PDFIUM_DIR_ENV) {
            let mut extra: Vec<PathBuf> = std::env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            extra.append(&mut config.pdfium_library_dirs);
            config.pdfium_library_dirs = extra;
        }

        if let Some(raw) = lookup(MAX_PIXELS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(value) if value > 0 => config.max_image_pixels = value,
                _ => tracing::warn!(value = %raw, "ignoring invalid {}", MAX_PIXELS_ENV),
            }
        }

        config
    }
}
