use std::collections::HashMap;
use std::path::Path;

use super::ExtractionError;

/// Text of one PDF page (1-based page number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: usize,
    pub text: String,
}

/// Concatenate pages with boundary markers. Pages without text are skipped.
pub fn render_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .filter(|p| !p.text.trim().is_empty())
        .map(|p| format!("\n\n--- Page {} ---\n{}", p.page_number, p.text))
        .collect()
}

/// Document text extraction abstraction (allows mocking for tests)
pub trait TextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, ExtractionError>;

    /// All pages rendered into one prompt-ready string.
    fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        Ok(render_pages(&self.extract_pages(path)?))
    }
}

/// Mock extractor keyed by file name. Unknown files are reported as missing.
#[derive(Default)]
pub struct MockTextExtractor {
    texts: HashMap<String, String>,
    unparsable: Vec<String>,
}

impl MockTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` as a single page for `file_name`.
    pub fn with_text(mut self, file_name: &str, text: &str) -> Self {
        self.texts.insert(file_name.to_string(), text.to_string());
        self
    }

    /// Make `file_name` fail as an unparsable PDF.
    pub fn with_unparsable(mut self, file_name: &str) -> Self {
        self.unparsable.push(file_name.to_string());
        self
    }
}

impl TextExtractor for MockTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, ExtractionError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.unparsable.contains(&name) {
            return Err(ExtractionError::PdfParsing("mock: unparsable".into()));
        }

        self.texts
            .get(&name)
            .map(|text| {
                vec![PageText {
                    page_number: 1,
                    text: text.clone(),
                }]
            })
            .ok_or_else(|| ExtractionError::NotFound(path.to_path_buf()))
    }
}
