//! Schema validation for the coach-answer model payload.
//!
//! The model is asked for a strict JSON object; whatever comes back is checked
//! field by field before anything is returned to the caller. A payload that
//! fails any check is rejected wholesale — no partially trusted objects.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::llm_client::strip_json_fences;

/// The validated coach-answer payload, returned to the client verbatim.
///
/// `score` stays a raw JSON number so an integer rating round-trips without
/// being rewritten as a float. The 1-5 range is NOT enforced here; out-of-range
/// values pass through unchanged and the session client bands whatever arrives.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachReport {
    pub score: Number,
    pub summary: String,
    pub improved_answer: String,
    pub watchouts: Vec<Value>,
}

/// Outcome of validating raw model output against the coach-answer schema.
#[derive(Debug)]
pub enum ReportValidation {
    Valid(CoachReport),
    Invalid(String),
}

/// Parses and type-checks raw model output.
///
/// Markdown code fences are tolerated; everything else must match the schema
/// exactly: numeric `score`, string `summary` and `improvedAnswer`, array
/// `watchouts`.
pub fn validate_report(raw: &str) -> ReportValidation {
    let value: Value = match serde_json::from_str(strip_json_fences(raw)) {
        Ok(v) => v,
        Err(e) => {
            return ReportValidation::Invalid(format!("model output is not valid JSON: {e}"))
        }
    };

    let obj = match value.as_object() {
        Some(obj) => obj,
        None => return ReportValidation::Invalid("model output is not a JSON object".to_string()),
    };

    let score = match obj.get("score") {
        Some(Value::Number(n)) => n.clone(),
        _ => return ReportValidation::Invalid("`score` must be a number".to_string()),
    };

    let summary = match obj.get("summary") {
        Some(Value::String(s)) => s.clone(),
        _ => return ReportValidation::Invalid("`summary` must be a string".to_string()),
    };

    let improved_answer = match obj.get("improvedAnswer") {
        Some(Value::String(s)) => s.clone(),
        _ => return ReportValidation::Invalid("`improvedAnswer` must be a string".to_string()),
    };

    let watchouts = match obj.get("watchouts") {
        Some(Value::Array(items)) => items.clone(),
        _ => return ReportValidation::Invalid("`watchouts` must be an array".to_string()),
    };

    ReportValidation::Valid(CoachReport {
        score,
        summary,
        improved_answer,
        watchouts,
    })
}
