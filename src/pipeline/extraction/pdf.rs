use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use super::types::{PageText, TextExtractor};
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages come back empty.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// pdf-extract panics on some malformed files (e.g. a page using a font
    /// its resources never declare). A panic is reported as a parse failure.
    pub fn extract_from_bytes(&self, pdf_bytes: &[u8]) -> Result<Vec<PageText>, ExtractionError> {
        let page_texts = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        }))
        .map_err(|payload| {
            ExtractionError::PdfParsing(format!("pdf-extract panicked: {}", panic_message(&*payload)))
        })?
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        Ok(page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText {
                page_number: i + 1,
                text,
            })
            .collect())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, ExtractionError> {
        let bytes = std::fs::read(path)?;
        let pages = self.extract_from_bytes(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            pages = pages.len(),
            "Extracted PDF text"
        );
        Ok(pages)
    }
}
