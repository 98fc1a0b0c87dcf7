//! In-memory file and blob values

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// MIME type of PDF input
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// MIME type of rendered output
pub const PNG_MIME_TYPE: &str = "image/png";

/// Encoded bytes with a MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    mime_type: String,
    data: Arc<[u8]>,
}

impl Blob {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A named binary file, the input and output of a conversion
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryFile {
    name: String,
    #[serde(rename = "type")]
    mime_type: String,
    last_modified: DateTime<Utc>,
    size: usize,
    #[serde(skip)]
    data: Arc<[u8]>,
}

impl BinaryFile {
    /// Create a file from in-memory bytes
    pub fn new(
        data: impl Into<Arc<[u8]>>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            last_modified: Utc::now(),
            size: data.len(),
            data,
        }
    }

    /// Wrap a blob under the given name, keeping the blob's MIME type
    pub fn from_blob(blob: &Blob, name: impl Into<String>) -> Self {
        Self::new(blob.data.clone(), name, blob.mime_type.clone())
    }

    /// Read a file from disk; the name is the path's final component
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mime_type = if is_pdf_name(&name) {
            PDF_MIME_TYPE
        } else {
            "application/octet-stream"
        };

        Ok(Self::new(data, name, mime_type))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Borrow the contents without suspending
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Obtain the contents as a shared buffer.
    ///
    /// This is the suspension point callers await before decoding, so
    /// sources that stream their data can slot in behind the same call.
    pub async fn read_bytes(&self) -> Result<Arc<[u8]>> {
        tokio::task::yield_now().await;
        Ok(self.data.clone())
    }
}

fn is_pdf_name(name: &str) -> bool {
    pdf_suffix_start(name).is_some()
}

/// Byte offset of a trailing, case-insensitive `.pdf`
fn pdf_suffix_start(name: &str) -> Option<usize> {
    let start = name.len().checked_sub(4)?;
    if !name.is_char_boundary(start) {
        return None;
    }
    name[start..].eq_ignore_ascii_case(".pdf").then_some(start)
}

/// Output name for a rendered document.
///
/// A trailing `.pdf` (any case) is replaced with `.png`. Names without that
/// suffix are returned unchanged.
pub fn png_file_name(name: &str) -> String {
    match pdf_suffix_start(name) {
        Some(start) => format!("{}.png", &name[..start]),
        None => name.to_string(),
    }
}
