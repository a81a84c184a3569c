//! PDF preview state: object URLs for the original and filled documents.

use std::sync::Arc;

use formfill_core::pdf::{ObjectUrlRegistry, PDF_MIME_TYPE, PdfDisplayMode, PdfFile, filled_file_name};

/// One live object URL and the bytes behind it.
#[derive(Debug)]
struct PreviewUrl {
    url: String,
    bytes: Arc<[u8]>,
}

impl PreviewUrl {
    fn holds(&self, bytes: &Arc<[u8]>) -> bool {
        Arc::ptr_eq(&self.bytes, bytes)
    }
}

/// Holds at most one object URL per document and revokes each one when it
/// is replaced, cleared, or the preview is dropped.
///
/// A URL is only replaced when the bytes change identity; handing back the
/// same `Arc` keeps the current URL.
pub struct PdfPreview {
    registry: Arc<dyn ObjectUrlRegistry>,
    original_name: Option<String>,
    original: Option<PreviewUrl>,
    filled: Option<PreviewUrl>,
}

impl PdfPreview {
    pub fn new(registry: Arc<dyn ObjectUrlRegistry>) -> Self {
        Self {
            registry,
            original_name: None,
            original: None,
            filled: None,
        }
    }

    /// Shows a newly uploaded PDF, or clears the preview with `None`.
    pub fn set_original(&mut self, pdf: Option<&PdfFile>) {
        if let (Some(current), Some(pdf)) = (&self.original, pdf) {
            if current.holds(&pdf.bytes) {
                self.original_name = Some(pdf.name.clone());
                return;
            }
        }
        self.release_original();
        if let Some(pdf) = pdf {
            self.original_name = Some(pdf.name.clone());
            self.original = Some(self.acquire(pdf.bytes.clone()));
        }
    }

    /// Points the filled view at new bytes, or clears it with `None`.
    pub fn set_filled(&mut self, bytes: Option<Arc<[u8]>>) {
        if let (Some(current), Some(bytes)) = (&self.filled, &bytes) {
            if current.holds(bytes) {
                return;
            }
        }
        if let Some(previous) = self.filled.take() {
            self.registry.revoke_object_url(&previous.url);
        }
        if let Some(bytes) = bytes {
            self.filled = Some(self.acquire(bytes));
        }
    }

    /// Syncs both views with the session's current PDFs.
    pub fn sync(&mut self, original: Option<&PdfFile>, filled: Option<Arc<[u8]>>) {
        self.set_original(original);
        self.set_filled(filled);
    }

    /// The URL to display. `Filled` falls back to the original until a
    /// filled PDF exists.
    pub fn current_url(&self, mode: PdfDisplayMode) -> Option<&str> {
        let filled = match mode {
            PdfDisplayMode::Filled => self.filled.as_ref(),
            PdfDisplayMode::Original => None,
        };
        filled.or(self.original.as_ref()).map(|p| p.url.as_str())
    }

    pub fn has_filled_pdf(&self) -> bool {
        self.filled.is_some()
    }

    /// Download name for the filled PDF, e.g. `form_filled.pdf`.
    ///
    /// `None` until there is both an original and a filled PDF.
    pub fn download_file_name(&self) -> Option<String> {
        if self.filled.is_none() {
            return None;
        }
        self.original_name.as_deref().map(filled_file_name)
    }

    fn acquire(&self, bytes: Arc<[u8]>) -> PreviewUrl {
        PreviewUrl {
            url: self.registry.create_object_url(bytes.clone(), PDF_MIME_TYPE),
            bytes,
        }
    }

    fn release_original(&mut self) {
        self.original_name = None;
        if let Some(previous) = self.original.take() {
            self.registry.revoke_object_url(&previous.url);
        }
    }
}

impl Drop for PdfPreview {
    fn drop(&mut self) {
        self.release_original();
        self.set_filled(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfill_infrastructure::MemoryObjectUrls;

    fn preview() -> (PdfPreview, Arc<MemoryObjectUrls>) {
        let urls = Arc::new(MemoryObjectUrls::new("https://fill.example"));
        (PdfPreview::new(urls.clone()), urls)
    }

    fn pdf(name: &str) -> PdfFile {
        PdfFile::new(name, &b"%PDF-1.7"[..])
    }

    #[test]
    fn test_filled_mode_falls_back_to_original() {
        let (mut preview, _) = preview();
        assert_eq!(preview.current_url(PdfDisplayMode::Filled), None);

        preview.set_original(Some(&pdf("w9.pdf")));
        let original = preview.current_url(PdfDisplayMode::Original).unwrap().to_string();
        assert_eq!(preview.current_url(PdfDisplayMode::Filled), Some(original.as_str()));
        assert!(!preview.has_filled_pdf());

        preview.set_filled(Some(Arc::from(&b"%PDF-filled"[..])));
        let filled = preview.current_url(PdfDisplayMode::Filled).unwrap();
        assert_ne!(filled, original);
        assert_eq!(preview.current_url(PdfDisplayMode::Original), Some(original.as_str()));
        assert!(preview.has_filled_pdf());
    }

    #[test]
    fn test_replacing_revokes_previous_url() {
        let (mut preview, urls) = preview();
        preview.set_filled(Some(Arc::from(&b"one"[..])));
        let first = preview.current_url(PdfDisplayMode::Filled).unwrap().to_string();

        preview.set_filled(Some(Arc::from(&b"two"[..])));

        assert!(!urls.is_live(&first));
        assert_eq!(urls.live_count(), 1);
    }

    #[test]
    fn test_drop_revokes_everything() {
        let (mut preview, urls) = preview();
        preview.sync(Some(&pdf("w9.pdf")), Some(Arc::from(&b"filled"[..])));
        assert_eq!(urls.live_count(), 2);

        drop(preview);
        assert_eq!(urls.live_count(), 0);
    }

    #[test]
    fn test_resync_with_same_bytes_keeps_urls() {
        let (mut preview, urls) = preview();
        let upload = pdf("w9.pdf");
        let filled: Arc<[u8]> = Arc::from(&b"%PDF-filled"[..]);

        preview.sync(Some(&upload), Some(filled.clone()));
        let original = preview.current_url(PdfDisplayMode::Original).unwrap().to_string();
        let shown = preview.current_url(PdfDisplayMode::Filled).unwrap().to_string();

        preview.sync(Some(&upload.clone()), Some(filled.clone()));

        assert_eq!(preview.current_url(PdfDisplayMode::Original), Some(original.as_str()));
        assert_eq!(preview.current_url(PdfDisplayMode::Filled), Some(shown.as_str()));
        assert!(urls.is_live(&original));
        assert!(urls.is_live(&shown));
        assert_eq!(urls.live_count(), 2);
    }

    #[test]
    fn test_equal_but_distinct_bytes_get_a_new_url() {
        let (mut preview, urls) = preview();
        preview.set_filled(Some(Arc::from(&b"same"[..])));
        let first = preview.current_url(PdfDisplayMode::Filled).unwrap().to_string();

        preview.set_filled(Some(Arc::from(&b"same"[..])));

        assert!(!urls.is_live(&first));
        assert_eq!(urls.live_count(), 1);
    }

    #[test]
    fn test_download_name_needs_a_filled_pdf() {
        let (mut preview, _) = preview();
        preview.set_original(Some(&pdf("w9.pdf")));
        assert_eq!(preview.download_file_name(), None);

        preview.set_filled(Some(Arc::from(&b"filled"[..])));
        assert_eq!(preview.download_file_name().as_deref(), Some("w9_filled.pdf"));

        preview.set_filled(None);
        assert_eq!(preview.download_file_name(), None);
    }

    #[test]
    fn test_clearing_original_forgets_name() {
        let (mut preview, urls) = preview();
        preview.set_original(Some(&pdf("w9.pdf")));
        preview.set_filled(Some(Arc::from(&b"filled"[..])));
        assert_eq!(preview.download_file_name().as_deref(), Some("w9_filled.pdf"));

        preview.set_original(None);
        preview.set_filled(None);
        assert_eq!(preview.download_file_name(), None);
        assert_eq!(preview.current_url(PdfDisplayMode::Original), None);
        assert_eq!(urls.live_count(), 0);
    }
}
