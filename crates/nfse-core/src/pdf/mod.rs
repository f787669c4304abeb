//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use std::path::Path;

use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF, all pages concatenated.
    fn extract_text(&self) -> Result<String>;
}

/// Renders a document on disk to plain text with its line breaks kept.
pub trait TextRenderer {
    fn render(&self, path: &Path) -> crate::Result<String>;
}

/// [`TextRenderer`] backed by [`PdfExtractor`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextRenderer;

impl TextRenderer for PdfTextRenderer {
    fn render(&self, path: &Path) -> crate::Result<String> {
        let data = std::fs::read(path)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;

        let text = extractor.extract_text()?;
        debug!(
            "Rendered {} ({} pages, {} chars)",
            path.display(),
            extractor.page_count(),
            text.len()
        );
        Ok(text)
    }
}
