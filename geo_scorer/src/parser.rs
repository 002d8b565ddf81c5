use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::error;

use crate::error::{GeoError, GeoResult};
use crate::{GeoAnalysis, GeoImprovement, IMPROVEMENT_COUNT};

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\r?\n(.*?)\r?\n```").unwrap())
}

/// Inner text of the first fenced code block, if the reply has one. The
/// fence markers must sit on their own lines.
fn fenced_block(raw: &str) -> Option<&str> {
    fence_re()
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Pulls the JSON candidate out of the model reply and parses it.
pub fn parse_reply(raw: &str) -> GeoResult<Value> {
    let candidate = fenced_block(raw).unwrap_or(raw).trim();
    serde_json::from_str(candidate).map_err(|e| {
        error!("Failed to parse AI response: {}", e);
        GeoError::Parse
    })
}

/// Checks presence and type of every field and builds the typed analysis.
///
/// A zero score and an empty diagnostic are valid. Exactly
/// [`IMPROVEMENT_COUNT`] improvements are required; numeric ranges are
/// taken as given.
pub fn validate(value: Value) -> GeoResult<GeoAnalysis> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("expected a JSON object"))?;

    let score = required(obj, "score")?;
    let score = as_integer(score).ok_or_else(|| invalid("score must be a number"))?;

    let diagnostic = required(obj, "diagnostic")?
        .as_str()
        .ok_or_else(|| invalid("diagnostic must be a string"))?
        .to_string();

    let items = required(obj, "improvements")?
        .as_array()
        .ok_or_else(|| invalid("improvements must be an array"))?;

    if items.len() != IMPROVEMENT_COUNT {
        return Err(invalid(&format!(
            "expected {} improvements, got {}",
            IMPROVEMENT_COUNT,
            items.len()
        )));
    }

    let improvements = items
        .iter()
        .enumerate()
        .map(|(i, item)| improvement(i, item))
        .collect::<GeoResult<Vec<_>>>()?;

    Ok(GeoAnalysis::new(score, diagnostic, improvements))
}

pub fn parse_and_validate(raw: &str) -> GeoResult<GeoAnalysis> {
    validate(parse_reply(raw)?)
}

fn improvement(index: usize, item: &Value) -> GeoResult<GeoImprovement> {
    let malformed = || invalid(&format!("improvement {} needs a string text and a numeric score", index + 1));

    let text = item.get("text").and_then(Value::as_str).ok_or_else(malformed)?;
    let score = item.get("score").and_then(as_integer).ok_or_else(malformed)?;

    Ok(GeoImprovement {
        text: text.to_string(),
        score,
    })
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> GeoResult<&'a Value> {
    match obj.get(field) {
        Some(Value::Null) | None => Err(invalid(&format!("missing {field}"))),
        Some(v) => Ok(v),
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
}

fn invalid(detail: &str) -> GeoError {
    error!("Invalid analysis structure: {}", detail);
    GeoError::Validation(detail.to_string())
}
