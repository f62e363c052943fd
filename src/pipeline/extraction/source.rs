use std::path::{Path, PathBuf};

use super::ExtractionError;

/// A document to audit: where it lives and the name recorded in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: PathBuf,
    pub file_name: String,
}

impl DocumentRef {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path: path.to_path_buf(),
            file_name,
        }
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// PDFs directly inside `folder`, sorted by file name, at most `max_files`.
pub fn collect_pdfs(
    folder: &Path,
    max_files: Option<usize>,
) -> Result<Vec<DocumentRef>, ExtractionError> {
    if !folder.is_dir() {
        return Err(ExtractionError::NotFound(folder.to_path_buf()));
    }

    let mut documents = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && is_pdf(&path) {
            documents.push(DocumentRef::from_path(&path));
        }
    }
    documents.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    if let Some(limit) = max_files {
        documents.truncate(limit);
    }
    Ok(documents)
}

/// Resolve the audit input: a single file, or every PDF in a folder.
pub fn discover_documents(
    input: &Path,
    max_files: Option<usize>,
) -> Result<Vec<DocumentRef>, ExtractionError> {
    if input.is_dir() {
        collect_pdfs(input, max_files)
    } else if input.is_file() {
        Ok(vec![DocumentRef::from_path(input)])
    } else {
        Err(ExtractionError::NotFound(input.to_path_buf()))
    }
}
