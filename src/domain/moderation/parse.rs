//! Normalization of raw classifier replies into verdicts.
//!
//! Models often wrap JSON in markdown fences or surround it with prose, so
//! the reply is unwrapped before validation. A reply with no JSON object at
//! all is a backend failure; a JSON object that breaks the schema is judged
//! leniently.

use serde_json::Value;
use thiserror::Error;

use super::verdict::{Category, Verdict, ViolationType};

/// Raised when a classifier reply contains no usable JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierReplyError {
    #[error("classifier reply is empty")]
    Empty,

    #[error("classifier reply contains no JSON object")]
    NoJsonObject,

    #[error("classifier reply is not valid JSON: {0}")]
    Malformed(String),
}

const DEFAULT_SAFE_REASON: &str = "Content is appropriate";
const DEFAULT_UNSAFE_REASON: &str = "Inappropriate content detected";

/// Parses a raw classifier reply into a verdict.
pub fn parse_classifier_reply(raw: &str) -> Result<Verdict, ClassifierReplyError> {
    decode_json_object(raw).map(|value| verdict_from_value(&value))
}

/// Unwraps and decodes the single JSON object embedded in a model reply.
pub fn decode_json_object(raw: &str) -> Result<Value, ClassifierReplyError> {
    let body = extract_json_object(raw)?;
    serde_json::from_str(body).map_err(|e| ClassifierReplyError::Malformed(e.to_string()))
}

/// Applies the schema check to an already-decoded JSON value.
pub fn verdict_from_value(value: &Value) -> Verdict {
    let Some(is_safe) = value.get("isSafe").and_then(Value::as_bool) else {
        tracing::warn!("classifier reply has no boolean isSafe, accepting content");
        return Verdict::lenient();
    };

    let category = value
        .get("category")
        .and_then(Value::as_str)
        .and_then(|c| c.parse::<Category>().ok())
        .unwrap_or(Category::General);

    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    if is_safe {
        return Verdict::safe(
            category,
            reason.unwrap_or_else(|| DEFAULT_SAFE_REASON.to_string()),
        );
    }

    let violation = value
        .get("rejectionType")
        .and_then(Value::as_str)
        .and_then(ViolationType::from_rejection_type);

    match violation {
        Some(violation) => Verdict::unsafe_content(
            violation,
            category,
            reason.unwrap_or_else(|| DEFAULT_UNSAFE_REASON.to_string()),
        ),
        None => {
            tracing::warn!("classifier flagged content without a known rejectionType, accepting content");
            Verdict::lenient()
        }
    }
}

fn extract_json_object(raw: &str) -> Result<&str, ClassifierReplyError> {
    let trimmed = strip_code_fences(raw.trim());
    if trimmed.is_empty() {
        return Err(ClassifierReplyError::Empty);
    }

    let start = trimmed.find('{').ok_or(ClassifierReplyError::NoJsonObject)?;
    let end = trimmed.rfind('}').ok_or(ClassifierReplyError::NoJsonObject)?;
    if end < start {
        return Err(ClassifierReplyError::NoJsonObject);
    }

    Ok(&trimmed[start..=end])
}

fn strip_code_fences(text: &str) -> &str {
    let without_open = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}
