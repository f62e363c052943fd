use serde::Deserialize;

use super::prompt::build_extraction_prompt;
use super::AuditError;
use crate::models::{or_na, CourseAuditRecord, MatchResult, NA};
use crate::pipeline::llm::{lenient_text, parse_model_json, CallOutcome, LlmInvoker};

/// The JSON object the extraction prompt asks for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyllabusExtraction {
    #[serde(default, deserialize_with = "lenient_text")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub course_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub course_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub instructor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gold_statement: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub learning_outcome: Option<String>,
}

impl SyllabusExtraction {
    /// Turn the model's answer into a record for `file_name`.
    ///
    /// The designation is not resolved yet and the statement not yet judged,
    /// so the match result starts at its conservative value.
    pub fn into_record(self, file_name: &str) -> CourseAuditRecord {
        let mut record = CourseAuditRecord {
            file_name: file_name.to_string(),
            full_title: or_na(self.full_title.as_deref()),
            course_code: or_na(self.course_code.as_deref()),
            course_name: or_na(self.course_name.as_deref()),
            instructor_name: or_na(self.instructor_name.as_deref()),
            gold_statement_text: or_na(self.gold_statement.as_deref()),
            learning_outcome_text: or_na(self.learning_outcome.as_deref()),
            gold_designation: NA.to_string(),
            match_result: MatchResult::NotPresent,
            match_reason: String::new(),
            audit_error: None,
        };
        if record.has_gold_statement() {
            record.match_result = MatchResult::NotMatched;
        }
        record
    }
}

/// First LLM stage: syllabus text → course metadata and section text.
#[derive(Clone)]
pub struct SyllabusExtractor {
    invoker: LlmInvoker,
}

impl SyllabusExtractor {
    pub fn new(invoker: LlmInvoker) -> Self {
        Self { invoker }
    }

    /// Extract one document. Empty `document_text` is still sent; a scanned
    /// syllabus then comes back as all "NA".
    pub fn extract(
        &self,
        file_name: &str,
        document_text: &str,
    ) -> Result<CourseAuditRecord, AuditError> {
        let prompt = build_extraction_prompt(file_name, document_text);

        let response = match self.invoker.invoke(&prompt) {
            CallOutcome::Success { response, attempts } => {
                tracing::debug!(file = %file_name, attempts, "Extraction response received");
                response
            }
            CallOutcome::Failure { attempts, error } => {
                return Err(AuditError::TransientCall {
                    attempts,
                    source: error,
                });
            }
        };

        let extraction: SyllabusExtraction = parse_model_json(&response)?;

        if let Some(returned) = extraction.file_name.as_deref() {
            if returned.trim() != file_name {
                tracing::debug!(
                    file = %file_name,
                    returned = %returned,
                    "Model echoed a different file name, keeping the input name"
                );
            }
        }

        Ok(extraction.into_record(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pipeline::llm::{LlmError, MockLlmClient, ModelConfig, ParseError, RetryPolicy};

    fn extractor(client: Arc<MockLlmClient>) -> SyllabusExtractor {
        SyllabusExtractor::new(LlmInvoker::new(
            client,
            ModelConfig::default(),
            RetryPolicy::immediate(3),
        ))
    }

    const FULL_RESPONSE: &str = r#"{
        "file_name": "something-else.pdf",
        "full_title": "CEL 100 Great Ideas Politics & Ethics",
        "course_code": "CEL 100",
        "course_name": "Great Ideas Politics & Ethics",
        "instructor_name": "Dr. Jane Smith",
        "gold_statement": "This course fulfills the Civic and Economic Knowledge requirement.",
        "learning_outcome": ["Analyze theories.", "Apply frameworks."]
    }"#;

    #[test]
    fn file_name_always_comes_from_input() {
        let client = Arc::new(MockLlmClient::new(FULL_RESPONSE));
        let record = extractor(client).extract("CEL100_Fall.pdf", "text").unwrap();
        assert_eq!(record.file_name, "CEL100_Fall.pdf");
    }

    #[test]
    fn populates_record_fields() {
        let client = Arc::new(MockLlmClient::new(FULL_RESPONSE));
        let record = extractor(client).extract("a.pdf", "text").unwrap();
        assert_eq!(record.course_code, "CEL 100");
        assert_eq!(record.instructor_name, "Dr. Jane Smith");
        assert_eq!(record.learning_outcome_text, "Analyze theories.\nApply frameworks.");
        assert_eq!(record.gold_designation, "NA");
        assert_eq!(record.match_result, MatchResult::NotMatched);
        assert!(!record.is_degraded());
    }

    #[test]
    fn missing_and_null_fields_become_na() {
        let client = Arc::new(MockLlmClient::new(
            r#"{"course_code": null, "gold_statement": "  ", "full_title": "Intro"}"#,
        ));
        let record = extractor(client).extract("a.pdf", "").unwrap();
        assert_eq!(record.full_title, "Intro");
        assert_eq!(record.course_code, "NA");
        assert_eq!(record.instructor_name, "NA");
        assert_eq!(record.gold_statement_text, "NA");
        assert_eq!(record.match_result, MatchResult::NotPresent);
    }

    #[test]
    fn empty_document_text_still_calls_model() {
        let client = Arc::new(MockLlmClient::new(r#"{"gold_statement": "NA"}"#));
        extractor(client.clone()).extract("scan.pdf", "").unwrap();
        assert_eq!(client.call_count(), 1);
        assert!(client.prompts()[0].contains("scan.pdf"));
    }

    #[test]
    fn salvages_wrapped_response() {
        let client = Arc::new(MockLlmClient::new(
            "Sure, here is the JSON:\n```json\n{\"course_code\": \"ABS 130\"}\n```",
        ));
        let record = extractor(client).extract("a.pdf", "x").unwrap();
        assert_eq!(record.course_code, "ABS 130");
    }

    #[test]
    fn unparsable_response_is_parse_error() {
        let client = Arc::new(MockLlmClient::new("I could not read this document."));
        let err = extractor(client).extract("a.pdf", "x").unwrap_err();
        assert!(matches!(err, AuditError::Parse(ParseError::NoJsonObject)));
    }

    #[test]
    fn exhausted_retries_is_transient_error() {
        let client = Arc::new(MockLlmClient::failing(|| {
            LlmError::Connection("http://llm".into())
        }));
        let err = extractor(client.clone()).extract("a.pdf", "x").unwrap_err();
        match err {
            AuditError::TransientCall { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(client.call_count(), 3);
    }

    #[test]
    fn retries_then_succeeds() {
        let client = Arc::new(MockLlmClient::scripted(vec![
            Err(LlmError::Http("reset".into())),
            Ok(r#"{"course_code": "CIS 105"}"#.into()),
        ]));
        let record = extractor(client).extract("a.pdf", "x").unwrap();
        assert_eq!(record.course_code, "CIS 105");
    }
}
