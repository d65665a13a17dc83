//! JSON repair for model output.
//!
//! Models wrap JSON in code fences, use Python-style single quotes and literals, leave
//! trailing commas, and drop closing brackets when they hit a token limit. Fences are
//! stripped here and the rest goes through `llm_json`; anything still unparseable is a
//! [`ParsingError`].

use serde_json::Value;
use tracing::debug;

use super::error::{ParsingError, ParsingResult};

/// Removes a surrounding Markdown code fence and a leading `json` language tag.
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if text
        .get(..4)
        .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
    {
        text = &text[4..];
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim().to_string()
}

/// Rewrites almost-JSON into JSON, starting at the first `{` or `[`.
///
/// Returns `None` when the input contains no object or array, or the repair fails.
pub fn repair_json(raw: &str) -> Option<String> {
    let start = raw.find(['{', '['])?;
    llm_json::repair_json(&raw[start..], &Default::default()).ok()
}

/// Parses model output into JSON, repairing it if a direct parse fails.
pub fn parse_model_json_output(raw: &str) -> ParsingResult<Value> {
    let cleaned = strip_code_fences(raw);

    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return non_empty(value, raw);
    }

    let repaired = repair_json(&cleaned).ok_or_else(|| ParsingError::not_json(raw))?;
    debug!(
        original_len = raw.len(),
        repaired_len = repaired.len(),
        "Repaired model JSON output"
    );

    serde_json::from_str::<Value>(&repaired)
        .map_err(|_| ParsingError::not_json(raw))
        .and_then(|value| non_empty(value, raw))
}

fn non_empty(value: Value, raw: &str) -> ParsingResult<Value> {
    match &value {
        Value::Null => Err(ParsingError::not_json(raw)),
        Value::String(s) if s.trim().is_empty() => Err(ParsingError::not_json(raw)),
        _ => Ok(value),
    }
}
