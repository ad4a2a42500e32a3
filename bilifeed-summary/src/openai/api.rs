//! OpenAI-compatible request and response shapes.

use serde_json::{Value, json};

use crate::redact::safe_text;

// ============================================================================
// Constants
// ============================================================================

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default chat-completions endpoint.
pub const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default responses endpoint.
pub const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// Sampling temperature for every request.
pub const TEMPERATURE: f64 = 0.2;

const SYSTEM_PROMPT: &str = "Return valid JSON only.";

// ============================================================================
// API Mode
// ============================================================================

/// Which request shape the endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiMode {
    /// `/chat/completions` with a message pair.
    #[default]
    ChatCompletions,
    /// `/responses` with a single input string.
    Responses,
}

impl ApiMode {
    /// Parses a configured mode; anything unrecognized is chat completions.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "responses" => Self::Responses,
            _ => Self::ChatCompletions,
        }
    }

    fn path_suffix(self) -> &'static str {
        match self {
            Self::ChatCompletions => "/chat/completions",
            Self::Responses => "/responses",
        }
    }
}

// ============================================================================
// URL
// ============================================================================

/// Resolves the request URL for `base_url`.
///
/// An empty base picks the default endpoint for `mode`. Otherwise one
/// trailing slash is stripped and the mode's path appended, unless the base
/// already ends in a known API path.
pub fn api_url(base_url: &str, mode: ApiMode) -> String {
    let base = base_url.trim();
    if base.is_empty() {
        return match mode {
            ApiMode::ChatCompletions => CHAT_COMPLETIONS_URL.to_string(),
            ApiMode::Responses => RESPONSES_URL.to_string(),
        };
    }

    let base = base.strip_suffix('/').unwrap_or(base);
    let lower = base.to_lowercase();
    if lower.ends_with("/chat/completions") || lower.ends_with("/responses") {
        return base.to_string();
    }
    format!("{base}{}", mode.path_suffix())
}

// ============================================================================
// Request Bodies
// ============================================================================

/// Request body for `mode`.
pub fn request_body(model: &str, prompt: &str, mode: ApiMode, use_json_format: bool) -> Value {
    match mode {
        ApiMode::Responses => json!({
            "model": model,
            "temperature": TEMPERATURE,
            "input": prompt,
        }),
        ApiMode::ChatCompletions => {
            let mut body = json!({
                "model": model,
                "temperature": TEMPERATURE,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": prompt},
                ],
            });
            if use_json_format {
                body["response_format"] = json!({"type": "json_object"});
            }
            body
        }
    }
}

// ============================================================================
// Response Text
// ============================================================================

/// `choices[0].message.content`, empty if absent.
pub fn extract_chat_text(data: &Value) -> String {
    data.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// `output_text`, else every text part under `output[].content[]` joined
/// by newlines.
pub fn extract_responses_text(data: &Value) -> String {
    let direct = safe_text(data.get("output_text").and_then(Value::as_str).unwrap_or_default());
    if !direct.is_empty() {
        return direct;
    }

    let chunks: Vec<String> = data
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| {
            let kind = part
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_lowercase();
            kind == "output_text" || kind == "text"
        })
        .map(|part| safe_text(part.get("text").and_then(Value::as_str).unwrap_or_default()))
        .filter(|text| !text.is_empty())
        .collect();

    chunks.join("\n").trim().to_string()
}
