//! Audit driver.
//!
//! Runs every document through the same sequence:
//! read text → extract (LLM) → resolve designation → judge (LLM).
//!
//! Engines are injected (TextExtractor, LlmClient behind LlmInvoker) so the
//! driver is fully testable with mock implementations. A document that fails
//! becomes a degraded record; nothing a single document does can stop the
//! batch.

use serde::Serialize;

use crate::models::{CourseAuditRecord, MatchResult};
use crate::pipeline::audit::{GoldStatementJudge, SyllabusExtractor};
use crate::pipeline::extraction::{DocumentRef, ExtractionError, TextExtractor};
use crate::pipeline::llm::LlmInvoker;
use crate::reference::{CourseDesignations, DesignationStatements};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Counts for one run, logged by the CLI once the batch is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub complete: usize,
    pub degraded: usize,
    pub matched: usize,
    pub not_matched: usize,
    pub not_present: usize,
}

impl AuditSummary {
    pub fn from_records(records: &[CourseAuditRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            if record.is_degraded() {
                summary.degraded += 1;
            } else {
                summary.complete += 1;
            }
            match record.match_result {
                MatchResult::Matched => summary.matched += 1,
                MatchResult::NotMatched => summary.not_matched += 1,
                MatchResult::NotPresent => summary.not_present += 1,
            }
        }
        summary
    }

    pub fn log(&self) {
        tracing::info!(
            total = self.total,
            complete = self.complete,
            degraded = self.degraded,
            matched = self.matched,
            not_matched = self.not_matched,
            not_present = self.not_present,
            "Audit finished"
        );
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

pub struct AuditProcessor {
    text_extractor: Box<dyn TextExtractor + Send + Sync>,
    extractor: SyllabusExtractor,
    judge: GoldStatementJudge,
    designations: CourseDesignations,
    statements: DesignationStatements,
}

impl AuditProcessor {
    /// Both LLM stages share `invoker` (same client, model and retry policy).
    pub fn new(
        text_extractor: Box<dyn TextExtractor + Send + Sync>,
        invoker: LlmInvoker,
        designations: CourseDesignations,
        statements: DesignationStatements,
    ) -> Self {
        Self {
            text_extractor,
            extractor: SyllabusExtractor::new(invoker.clone()),
            judge: GoldStatementJudge::new(invoker),
            designations,
            statements,
        }
    }

    /// Audit documents in order. The returned records line up with `documents`.
    pub fn run(&self, documents: &[DocumentRef]) -> (Vec<CourseAuditRecord>, AuditSummary) {
        let total = documents.len();
        let mut records = Vec::with_capacity(total);

        for (index, document) in documents.iter().enumerate() {
            tracing::info!(
                file = %document.file_name,
                position = index + 1,
                total,
                "Auditing document"
            );
            records.push(self.process_document(document));
        }

        let summary = AuditSummary::from_records(&records);
        (records, summary)
    }

    /// Audit one document. Never fails: problems produce a degraded record.
    pub fn process_document(&self, document: &DocumentRef) -> CourseAuditRecord {
        let span = tracing::info_span!("document", file = %document.file_name);
        let _enter = span.enter();

        let text = match self.text_extractor.extract_text(&document.path) {
            Ok(text) => text,
            Err(ExtractionError::PdfParsing(reason)) => {
                // Scanned or malformed text layer: the extraction call still
                // runs and reports every field as "NA".
                tracing::warn!(error = %reason, "No readable text layer, sending empty text");
                String::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot read document, recording degraded result");
                return CourseAuditRecord::degraded(&document.file_name, e);
            }
        };

        tracing::debug!(text_length = text.len(), "Document text ready");

        let mut record = match self.extractor.extract(&document.file_name, &text) {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(error = %e, "Extraction failed, recording degraded result");
                return CourseAuditRecord::degraded(&document.file_name, e);
            }
        };

        self.resolve_and_judge(&mut record);
        record
    }

    /// Re-resolve designations and re-judge an existing result set.
    ///
    /// Degraded rows carry no extracted data and are passed through as-is.
    pub fn rematch(&self, records: Vec<CourseAuditRecord>) -> (Vec<CourseAuditRecord>, AuditSummary) {
        let records: Vec<CourseAuditRecord> = records
            .into_iter()
            .map(|mut record| {
                if record.is_degraded() {
                    tracing::debug!(file = %record.file_name, "Skipping degraded record");
                } else {
                    let span = tracing::info_span!("document", file = %record.file_name);
                    let _enter = span.enter();
                    self.resolve_and_judge(&mut record);
                }
                record
            })
            .collect();

        let summary = AuditSummary::from_records(&records);
        (records, summary)
    }

    fn resolve_and_judge(&self, record: &mut CourseAuditRecord) {
        record.gold_designation = self.designations.resolve(&record.course_code);
        if record.gold_designation == crate::models::NA {
            tracing::debug!(course_code = %record.course_code, "No designation registered for course");
        }

        let verdict = self.judge.judge(
            &record.gold_designation,
            &record.gold_statement_text,
            self.statements.expected_for(&record.gold_designation),
        );
        tracing::debug!(result = %verdict.result, "Judge verdict");

        record.match_result = verdict.result;
        record.match_reason = verdict.reason;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
