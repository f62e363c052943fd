pub mod types;
pub mod pdf;
pub mod source;

pub use types::*;
pub use pdf::*;
pub use source::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Input not found: {0}")]
    NotFound(PathBuf),
}
