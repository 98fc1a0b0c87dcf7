//! PDF rendering layer
//!
//! This module defines the engine capability and its PDFium implementation.

mod engine;
mod pdfium;
mod viewport;

pub use engine::{has_pdf_header, PdfEngine, HEADER_SEARCH_WINDOW};
pub use pdfium::PdfiumEngine;
pub use viewport::{Viewport, RENDER_SCALE};
