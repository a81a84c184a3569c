//! PDF handles and the object-URL port used to display them.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// MIME type used for every PDF object URL.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A PDF the user uploaded: its file name and its bytes.
///
/// Cloning is cheap; the bytes are shared.
#[derive(Clone, PartialEq)]
pub struct PdfFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl PdfFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Name offered when downloading the filled version of this file.
    pub fn filled_file_name(&self) -> String {
        filled_file_name(&self.name)
    }
}

impl fmt::Debug for PdfFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Maps `form.pdf` to `form_filled.pdf`.
///
/// Only the first `.pdf` is replaced; a name without one is returned as is.
pub fn filled_file_name(original: &str) -> String {
    original.replacen(".pdf", "_filled.pdf", 1)
}

/// Which document the preview shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfDisplayMode {
    #[default]
    Original,
    Filled,
}

/// Creates and revokes URLs that point at in-memory binary data.
///
/// In a browser this is `URL.createObjectURL` / `URL.revokeObjectURL`. Every
/// URL handed out must eventually be revoked or its bytes stay pinned.
pub trait ObjectUrlRegistry: Send + Sync {
    fn create_object_url(&self, bytes: Arc<[u8]>, mime_type: &str) -> String;

    fn revoke_object_url(&self, url: &str);
}

/// Where the filled PDF of a backend session can be fetched again.
///
/// Filled bytes are never cached locally, so after a reload they come back
/// from the assistant backend, keyed by its `user_session_id`.
#[async_trait]
pub trait FilledPdfSource: Send + Sync {
    /// # Returns
    ///
    /// - `Ok(Some(bytes))`: The backend still has a filled PDF
    /// - `Ok(None)`: Nothing has been filled for this backend session
    /// - `Err(_)`: The backend could not be reached or refused
    async fn fetch_filled_pdf(&self, user_session_id: &str) -> Result<Option<Arc<[u8]>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_file_name() {
        assert_eq!(filled_file_name("w9.pdf"), "w9_filled.pdf");
        assert_eq!(filled_file_name("a.pdf.pdf"), "a_filled.pdf.pdf");
        assert_eq!(filled_file_name("scan.PDF"), "scan.PDF");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let pdf = PdfFile::new("form.pdf", vec![1u8, 2, 3]);
        assert_eq!(format!("{pdf:?}"), "PdfFile { name: \"form.pdf\", len: 3 }");
    }
}
