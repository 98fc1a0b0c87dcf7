//! Error types for pdf2img

use thiserror::Error;

/// Result type alias for pdf2img
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned when no drawing surface is available
pub const UNSUPPORTED_ENVIRONMENT_MESSAGE: &str =
    "PDF conversion is only supported in a rendering environment.";

/// Message returned when the surface produced no encoded image
pub const EMPTY_IMAGE_MESSAGE: &str = "Failed to create image blob";

/// Error types for pdf2img
#[derive(Error, Debug)]
pub enum Error {
    /// No display/drawing capability was provided
    #[error("no rendering environment available")]
    UnsupportedEnvironment,

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// PDF is password protected
    #[error("PDF is password protected")]
    PasswordRequired,

    /// Page out of bounds
    #[error("Page {page} out of bounds (total: {total})")]
    PageOutOfBounds { page: u32, total: u32 },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// Rendering failed outside the PDF library (bad geometry, crashed task)
    #[error("Render error: {reason}")]
    Render { reason: String },

    /// Image encoding error
    #[error("Image encoding failed: {reason}")]
    Encode { reason: String },

    /// Surface produced no blob
    #[error("surface produced no image data")]
    EmptyImage,

    /// Image dimension exceeded
    #[error("Image dimension exceeded: {detail}")]
    ImageDimensionExceeded { detail: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The caller-facing message placed in `ConversionResult::error`.
    ///
    /// Only two shapes exist: the fixed environment/blob messages, and a
    /// generic prefix wrapping the underlying description.
    pub fn conversion_message(&self) -> String {
        match self {
            Error::UnsupportedEnvironment => UNSUPPORTED_ENVIRONMENT_MESSAGE.to_string(),
            Error::EmptyImage => EMPTY_IMAGE_MESSAGE.to_string(),
            other => format!("Failed to convert PDF: {}", other),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Encode {
            reason: err.to_string(),
        }
    }
}
