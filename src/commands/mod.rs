//! Command layer: wires configuration, reference tables, the LLM client and
//! the audit driver together for one CLI invocation.
//!
//! The LLM client is passed in so the same entry points run against a mock
//! in tests.

pub mod audit;
pub mod rematch;

pub use audit::*;
pub use rematch::*;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::{AuditConfig, ConfigError};
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::llm::{LlmClient, LlmError, LlmInvoker};
use crate::reference::{CourseDesignations, DesignationStatements, ReferenceError};
use crate::report::ReportError;

/// Failures that abort a run. Per-document problems never end up here.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Invalid input: {0}")]
    Input(#[from] ExtractionError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Reference table locations, each falling back to the configured path.
#[derive(Debug, Clone, Default)]
pub struct TableOverrides {
    pub course_table: Option<PathBuf>,
    pub statement_table: Option<PathBuf>,
}

/// Load both reference tables. Either one missing or empty aborts the run.
pub(crate) fn load_reference_tables(
    config: &AuditConfig,
    tables: &TableOverrides,
) -> Result<(CourseDesignations, DesignationStatements), RunError> {
    let course_table = resolve(&tables.course_table, &config.paths.course_table);
    let statement_table = resolve(&tables.statement_table, &config.paths.statement_table);

    let designations = CourseDesignations::load(course_table)?;
    let statements = DesignationStatements::load(statement_table)?;
    Ok((designations, statements))
}

fn resolve<'a>(explicit: &'a Option<PathBuf>, configured: &'a Path) -> &'a Path {
    explicit.as_deref().unwrap_or(configured)
}

/// Bind `client` to the configured model and retry policy, and warn early if
/// the model does not answer. The batch still runs: every document would come
/// back degraded, which is the behavior the results file should show.
pub(crate) fn prepare_invoker(
    config: &AuditConfig,
    client: Arc<dyn LlmClient + Send + Sync>,
) -> LlmInvoker {
    let invoker = LlmInvoker::new(client, config.llm.clone(), config.retry.policy());
    let model = invoker.model();
    match invoker.check_ready() {
        Ok(()) => tracing::info!(
            model = %model.name,
            provider = %model.provider,
            attempts = invoker.policy().attempts,
            "LLM ready"
        ),
        Err(e) => tracing::warn!(
            model = %model.name,
            error = %e,
            "LLM preflight failed, continuing"
        ),
    }
    invoker
}
