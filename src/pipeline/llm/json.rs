//! Lenient JSON decoding of model output.
//!
//! Models are told to answer with a bare JSON object but regularly wrap it in
//! prose or code fences. The whole text is tried first; failing that, the span
//! from the first `{` to the last `}` is decoded into the expected type.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No JSON object found in model response")]
    NoJsonObject,

    #[error("Invalid JSON in model response: {0}")]
    InvalidJson(String),
}

/// Decode a model response into `T`, salvaging a wrapped JSON object.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = serde_json::from_str::<T>(trimmed) {
        return Ok(parsed);
    }

    let block = json_object_span(trimmed).ok_or(ParseError::NoJsonObject)?;
    serde_json::from_str(block).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// The text between the first `{` and the last `}` inclusive.
pub fn json_object_span(text: &str) -> Option<&str> {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&text[start..=end]),
        _ => None,
    }
}

/// Field deserializer for free-text answers.
///
/// Accepts strings, numbers and booleans as text, joins arrays of scalars
/// with newlines (models like to return learning outcomes as a list), and
/// maps `null` to `None`. Nested objects are rejected.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    fn scalar(value: &Value) -> Option<Option<String>> {
        match value {
            Value::Null => Some(None),
            Value::String(s) => Some(Some(s.clone())),
            Value::Number(n) => Some(Some(n.to_string())),
            Value::Bool(b) => Some(Some(b.to_string())),
            _ => None,
        }
    }

    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    if let Some(text) = scalar(&value) {
        return Ok(text);
    }

    match value {
        Value::Array(items) => {
            let mut lines = Vec::with_capacity(items.len());
            for item in &items {
                match scalar(item) {
                    Some(Some(line)) => lines.push(line),
                    Some(None) => {}
                    None => return Err(D::Error::custom("nested value in text list")),
                }
            }
            Ok(if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n"))
            })
        }
        _ => Err(D::Error::custom("expected text, found an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        #[serde(rename = "match")]
        verdict: String,
        reason: String,
    }

    #[test]
    fn parses_bare_json() {
        let v: Verdict = parse_model_json(r#"{"match":"no","reason":"different"}"#).unwrap();
        assert_eq!(v.verdict, "no");
    }

    #[test]
    fn salvages_json_wrapped_in_prose() {
        let raw = "Here you go:\n{\"match\":\"yes\",\"reason\":\"ok\"}\nThanks";
        let v: Verdict = parse_model_json(raw).unwrap();
        assert_eq!(
            v,
            Verdict {
                verdict: "yes".into(),
                reason: "ok".into()
            }
        );
    }

    #[test]
    fn salvages_json_in_code_fence() {
        let raw = "```json\n{\"match\": \"no\", \"reason\": \"missing clause\"}\n```";
        let v: Verdict = parse_model_json(raw).unwrap();
        assert_eq!(v.reason, "missing clause");
    }

    #[test]
    fn no_braces_is_no_json_object() {
        let result: Result<Verdict, _> = parse_model_json("I cannot answer that.");
        assert_eq!(result.unwrap_err(), ParseError::NoJsonObject);
    }

    #[test]
    fn reversed_braces_is_no_json_object() {
        assert_eq!(json_object_span("} nothing {"), None);
    }

    #[test]
    fn broken_span_is_invalid_json() {
        let result: Result<Verdict, _> = parse_model_json("Sure! {match: yes} done");
        assert!(matches!(result, Err(ParseError::InvalidJson(_))));
    }

    #[derive(Debug, Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "lenient_text")]
        text: Option<String>,
    }

    #[test]
    fn lenient_text_accepts_scalars_and_lists() {
        let parse = |json: &str| serde_json::from_str::<Lenient>(json).unwrap().text;
        assert_eq!(parse(r#"{"text": "hi"}"#).as_deref(), Some("hi"));
        assert_eq!(parse(r#"{"text": 130}"#).as_deref(), Some("130"));
        assert_eq!(parse(r#"{"text": null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"text": ["a", "b"]}"#).as_deref(), Some("a\nb"));
        assert_eq!(parse(r#"{"text": []}"#), None);
    }

    #[test]
    fn lenient_text_rejects_objects() {
        assert!(serde_json::from_str::<Lenient>(r#"{"text": {"a": 1}}"#).is_err());
        assert!(serde_json::from_str::<Lenient>(r#"{"text": [{"a": 1}]}"#).is_err());
    }

    #[test]
    fn span_keeps_nested_braces() {
        let text = "x {\"a\": {\"b\": 1}} y";
        assert_eq!(json_object_span(text), Some("{\"a\": {\"b\": 1}}"));
    }
}
