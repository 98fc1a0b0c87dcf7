//! PDF engine capability

use crate::error::Result;
use crate::pdf::Viewport;
use crate::surface::DrawingSurface;

/// A PDF decoding and rendering library.
///
/// Implementations open the document, fetch the requested page (1-based),
/// size `surface` to the page viewport at `scale` and paint the page into it.
pub trait PdfEngine: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Render one page into `surface` and return the viewport used
    fn render_page(
        &self,
        data: &[u8],
        page_number: u16,
        scale: f32,
        surface: &mut dyn DrawingSurface,
    ) -> Result<Viewport>;
}

/// How far into the data the `%PDF-` marker may appear
pub const HEADER_SEARCH_WINDOW: usize = 1024;

const PDF_MARKER: &[u8] = b"%PDF-";

/// Look for the `%PDF-` marker in the first 1024 bytes.
///
/// Readers accept a preamble (byte-order mark, whitespace, mail headers)
/// before the marker, so it is not required at offset zero.
pub fn has_pdf_header(data: &[u8]) -> bool {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    window
        .windows(PDF_MARKER.len())
        .any(|candidate| candidate == PDF_MARKER)
}
