//! Lenient JSON extraction from model output.
//!
//! Models wrap JSON in prose or code fences despite instructions. Tried in
//! order: the whole text, a fenced block, the widest `{...}` span.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*(\{[\s\S]*\})\s*```").expect("valid regex"));

static BRACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\{[\s\S]*\})").expect("valid regex"));

/// Parses the first JSON value found in `raw`, or an empty object.
pub fn extract_json(raw: &str) -> Value {
    let text = raw.trim();
    if text.is_empty() {
        return empty();
    }

    if let Ok(value) = serde_json::from_str(text) {
        return value;
    }

    if let Some(value) = FENCED
        .captures(text)
        .and_then(|c| serde_json::from_str(&c[1]).ok())
    {
        return value;
    }

    BRACED
        .captures(text)
        .and_then(|c| serde_json::from_str(&c[1]).ok())
        .unwrap_or_else(empty)
}

fn empty() -> Value {
    Value::Object(Map::new())
}
