//! Extract-then-judge: the two LLM stages of a syllabus audit.

pub mod prompt;
pub mod extractor;
pub mod judge;

pub use prompt::*;
pub use extractor::*;
pub use judge::*;

use thiserror::Error;

use crate::pipeline::llm::{LlmError, ParseError};

/// Per-document failure of the extraction stage. Never aborts a batch.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("LLM call failed after {attempts} attempt(s): {source}")]
    TransientCall {
        attempts: u32,
        #[source]
        source: LlmError,
    },

    #[error("Unusable extraction response: {0}")]
    Parse(#[from] ParseError),
}
