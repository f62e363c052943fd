use std::path::PathBuf;
use std::sync::Arc;

use super::{load_reference_tables, prepare_invoker, RunError, TableOverrides};
use crate::config::AuditConfig;
use crate::pipeline::extraction::{discover_documents, PdfTextExtractor};
use crate::pipeline::llm::LlmClient;
use crate::pipeline::processor::{AuditProcessor, AuditSummary};
use crate::report::{default_output_path, write_records};

/// Inputs of `syllabus-audit audit`.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// A single PDF or a folder of PDFs.
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub max_files: Option<usize>,
    pub tables: TableOverrides,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// `None` when there was nothing to write.
    pub output: Option<PathBuf>,
    pub summary: AuditSummary,
}

/// Audit every document under `request.input` and write the result table once.
pub fn run_audit(
    config: &AuditConfig,
    request: &AuditRequest,
    client: Arc<dyn LlmClient + Send + Sync>,
) -> Result<RunReport, RunError> {
    let (designations, statements) = load_reference_tables(config, &request.tables)?;

    let documents = discover_documents(&request.input, request.max_files)?;
    if documents.is_empty() {
        tracing::warn!(input = %request.input.display(), "No PDF files found, nothing to audit");
        return Ok(RunReport {
            output: None,
            summary: AuditSummary::default(),
        });
    }
    tracing::info!(count = documents.len(), "Documents queued");

    let invoker = prepare_invoker(config, client);
    let processor = AuditProcessor::new(
        Box::new(PdfTextExtractor),
        invoker,
        designations,
        statements,
    );

    let (records, summary) = processor.run(&documents);

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&request.input, &config.paths.output_dir));
    write_records(&output, &records)?;
    summary.log();

    Ok(RunReport {
        output: Some(output),
        summary,
    })
}
