use std::path::PathBuf;
use std::sync::Arc;

use super::{load_reference_tables, prepare_invoker, RunError, RunReport, TableOverrides};
use crate::config::AuditConfig;
use crate::pipeline::extraction::PdfTextExtractor;
use crate::pipeline::llm::LlmClient;
use crate::pipeline::processor::AuditProcessor;
use crate::report::{read_records, write_records};

/// Inputs of `syllabus-audit rematch`.
#[derive(Debug, Clone)]
pub struct RematchRequest {
    /// Result CSV from a previous audit.
    pub results: PathBuf,
    /// Defaults to overwriting `results`.
    pub output: Option<PathBuf>,
    pub tables: TableOverrides,
}

/// Re-resolve designations and re-judge a stored result table without
/// extracting the PDFs again. Useful after the reference tables change.
pub fn run_rematch(
    config: &AuditConfig,
    request: &RematchRequest,
    client: Arc<dyn LlmClient + Send + Sync>,
) -> Result<RunReport, RunError> {
    let (designations, statements) = load_reference_tables(config, &request.tables)?;

    let records = read_records(&request.results)?;
    tracing::info!(
        path = %request.results.display(),
        rows = records.len(),
        "Re-matching stored results"
    );

    let invoker = prepare_invoker(config, client);
    let processor = AuditProcessor::new(
        Box::new(PdfTextExtractor),
        invoker,
        designations,
        statements,
    );
    let (records, summary) = processor.rematch(records);

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| request.results.clone());
    write_records(&output, &records)?;
    summary.log();

    Ok(RunReport {
        output: Some(output),
        summary,
    })
}
