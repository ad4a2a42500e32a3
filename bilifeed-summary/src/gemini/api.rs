//! Gemini `generateContent` request and response shapes.

use serde_json::{Value, json};
use url::Url;

use crate::error::ProviderError;
use crate::redact::safe_text;

/// Generative Language API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Sampling temperature for every request.
pub const TEMPERATURE: f64 = 0.2;

/// `generateContent` URL for `model`, with the key as a query parameter.
///
/// # Errors
///
/// Returns [`ProviderError::Request`] if the model name makes the URL
/// unparseable.
pub fn generate_url(model: &str, api_key: &str) -> Result<Url, ProviderError> {
    let mut url = Url::parse(&format!(
        "{GEMINI_API_BASE}/v1beta/models/{model}:generateContent"
    ))
    .map_err(|e| ProviderError::Request(format!("Invalid model URL: {e}")))?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

/// Single-part `contents` body.
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{"parts": [{"text": prompt}]}],
        "generationConfig": {"temperature": TEMPERATURE},
    })
}

/// First part of the first candidate, flattened to one line.
pub fn extract_text(data: &Value) -> String {
    safe_text(
        data.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        let url = generate_url("gemini-1.5-flash", "AIza-key").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=AIza-key"
        );
    }

    #[test]
    fn test_request_body() {
        let body = request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["temperature"], 0.2);
    }
}
