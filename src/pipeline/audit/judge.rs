use serde::Deserialize;

use super::prompt::build_judge_prompt;
use crate::models::{is_na, MatchResult};
use crate::pipeline::llm::{lenient_text, parse_model_json, CallOutcome, LlmInvoker};

/// The JSON object the judge prompt asks for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JudgeResponse {
    #[serde(rename = "match", default, deserialize_with = "lenient_text")]
    pub verdict: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeVerdict {
    pub result: MatchResult,
    pub reason: String,
}

impl JudgeVerdict {
    fn new(result: MatchResult, reason: impl Into<String>) -> Self {
        Self {
            result,
            reason: reason.into(),
        }
    }
}

/// Second LLM stage: does the syllabus Gold Statement match the official one?
///
/// Fails closed. Missing inputs are decided without a call, and every call or
/// parse failure is a `not_matched` verdict rather than an error.
#[derive(Clone)]
pub struct GoldStatementJudge {
    invoker: LlmInvoker,
}

impl GoldStatementJudge {
    pub fn new(invoker: LlmInvoker) -> Self {
        Self { invoker }
    }

    pub fn judge(
        &self,
        gold_designation: &str,
        syllabus_statement: &str,
        expected_statement: Option<&str>,
    ) -> JudgeVerdict {
        if is_na(syllabus_statement) {
            return JudgeVerdict::new(
                MatchResult::NotPresent,
                "No Gold Statement found in the syllabus",
            );
        }

        let expected = match expected_statement {
            Some(text) if !is_na(text) => text,
            _ => {
                tracing::debug!(
                    designation = %gold_designation,
                    "No expected statement registered, skipping judge call"
                );
                return JudgeVerdict::new(
                    MatchResult::NotMatched,
                    format!("No expected statement registered for designation '{gold_designation}'"),
                );
            }
        };

        let prompt = build_judge_prompt(gold_designation, expected, syllabus_statement);
        let outcome = self.invoker.invoke(&prompt);
        tracing::debug!(
            designation = %gold_designation,
            attempts = outcome.attempts(),
            success = outcome.is_success(),
            "Judge call finished"
        );
        let response = match outcome {
            CallOutcome::Success { response, .. } => response,
            CallOutcome::Failure { attempts, error } => {
                tracing::warn!(
                    designation = %gold_designation,
                    attempts,
                    error = %error,
                    "Judge call failed, recording not_matched"
                );
                return JudgeVerdict::new(
                    MatchResult::NotMatched,
                    format!("Judge call failed: {error}"),
                );
            }
        };

        let parsed: JudgeResponse = match parse_model_json(&response) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    designation = %gold_designation,
                    error = %e,
                    "Judge response unparsable, recording not_matched"
                );
                return JudgeVerdict::new(
                    MatchResult::NotMatched,
                    format!("Unparsable judge response: {e}"),
                );
            }
        };

        let result = if parsed.verdict.as_deref() == Some("yes") {
            MatchResult::Matched
        } else {
            MatchResult::NotMatched
        };
        JudgeVerdict::new(result, parsed.reason.unwrap_or_default().trim())
    }
}
