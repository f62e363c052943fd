use serde::{Deserialize, Serialize};

use super::enums::MatchResult;

/// Sentinel for "not found / not applicable".
pub const NA: &str = "NA";

/// True when `text` carries no content: blank or the "NA" sentinel.
pub fn is_na(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == NA
}

/// Trim a text field, mapping missing or blank values to "NA".
pub fn or_na(text: Option<&str>) -> String {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => NA.to_string(),
    }
}

/// One audited syllabus: a row of the result table.
///
/// `file_name` always comes from the input path, never from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAuditRecord {
    pub file_name: String,
    pub full_title: String,
    pub course_code: String,
    pub course_name: String,
    pub instructor_name: String,
    #[serde(rename = "gold_statement")]
    pub gold_statement_text: String,
    #[serde(rename = "learning_outcome")]
    pub learning_outcome_text: String,
    pub gold_designation: String,
    pub match_result: MatchResult,
    #[serde(default)]
    pub match_reason: String,
    /// Set only on degraded records.
    #[serde(default)]
    pub audit_error: Option<String>,
}

impl CourseAuditRecord {
    /// A record with every field "NA". The match result already reflects the
    /// empty gold statement.
    pub fn empty(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            full_title: NA.into(),
            course_code: NA.into(),
            course_name: NA.into(),
            instructor_name: NA.into(),
            gold_statement_text: NA.into(),
            learning_outcome_text: NA.into(),
            gold_designation: NA.into(),
            match_result: MatchResult::NotPresent,
            match_reason: String::new(),
            audit_error: None,
        }
    }

    /// Placeholder row for a document whose extraction failed.
    pub fn degraded(file_name: &str, error: impl ToString) -> Self {
        Self {
            match_result: MatchResult::NotMatched,
            audit_error: Some(error.to_string()),
            ..Self::empty(file_name)
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.audit_error.is_some()
    }

    pub fn has_gold_statement(&self) -> bool {
        !is_na(&self.gold_statement_text)
    }
}
