//! pdf2img
//!
//! Renders the first page of a PDF document to a PNG image:
//! - `PdfPageRasterizer`: environment check, decode, rasterize at 3x, encode, wrap
//! - `convert_pdf_to_image`: the same pipeline on a process-wide default rasterizer
//! - `ObjectUrlRegistry`: transient `blob:` URLs for the encoded images

pub mod config;
pub mod error;
pub mod file;
pub mod object_url;
pub mod pdf;
pub mod rasterizer;
pub mod surface;

pub use config::RasterizerConfig;
pub use error::{Error, Result};
pub use file::{png_file_name, BinaryFile, Blob};
pub use object_url::ObjectUrlRegistry;
pub use pdf::{PdfEngine, PdfiumEngine, Viewport, RENDER_SCALE};
pub use rasterizer::{
    convert_pdf_to_image, default_object_urls, ConversionResult, PdfPageRasterizer,
};
pub use surface::{DrawingSurface, ImageSurface, ImageSurfaceProvider, SurfaceProvider};
