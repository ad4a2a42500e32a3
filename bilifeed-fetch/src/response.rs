//! Feed page request and response types.
//!
//! The endpoint is undocumented and its field types drift (numbers as
//! strings, `has_more` as `0/1`, `null` lists), so the response types
//! deserialize leniently: a wrong-typed field degrades to its empty value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `code` value of a successful response.
pub const SUCCESS_CODE: i64 = 0;

/// `code` used for responses synthesized from transport failures.
pub const TRANSPORT_FAILURE_CODE: i64 = -1;

// ============================================================================
// Request
// ============================================================================

/// Query parameters of one page request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Feed category.
    #[serde(rename = "type")]
    pub feed_type: String,
    /// Pagination cursor; empty for the first page.
    pub offset: String,
    /// Update baseline cursor; empty for the first page.
    pub update_baseline: String,
    /// Feature-flag string.
    pub features: String,
    /// Location tag.
    pub web_location: String,
}

// ============================================================================
// Response
// ============================================================================

/// One decoded feed response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedResponse {
    /// `0` on success.
    #[serde(default = "missing_code", deserialize_with = "lenient_code")]
    pub code: i64,
    /// Error message.
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    /// Alternative error message field.
    #[serde(default, deserialize_with = "lenient_string")]
    pub msg: String,
    /// Page payload, present on success.
    #[serde(default, deserialize_with = "lenient_page")]
    pub data: Option<FeedPage>,
}

/// Payload of a successful page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedPage {
    /// Raw feed items.
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<Value>,
    /// Cursor for the next page.
    #[serde(default, deserialize_with = "lenient_string")]
    pub offset: String,
    /// Baseline cursor for the next page.
    #[serde(default, deserialize_with = "lenient_string")]
    pub update_baseline: String,
    /// Whether another page exists.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_more: bool,
}

impl FeedResponse {
    /// A successful response carrying `page`.
    pub fn success(page: FeedPage) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: String::new(),
            msg: String::new(),
            data: Some(page),
        }
    }

    /// An API-level failure.
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            msg: String::new(),
            data: None,
        }
    }

    /// A failure synthesized from a transport error.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::failure(TRANSPORT_FAILURE_CODE, message)
    }

    /// Returns true if `code` is the success sentinel.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// `message`, else `msg`; empty if neither is set.
    pub fn error_message(&self) -> &str {
        if self.message.is_empty() {
            &self.msg
        } else {
            &self.message
        }
    }
}

fn missing_code() -> i64 {
    TRANSPORT_FAILURE_CODE
}

fn lenient_code<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().unwrap_or(TRANSPORT_FAILURE_CODE),
        Value::String(s) => s.trim().parse().unwrap_or(TRANSPORT_FAILURE_CODE),
        _ => TRANSPORT_FAILURE_CODE,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    })
}

fn lenient_items<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

fn lenient_page<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FeedPage>, D::Error> {
    let value = Value::deserialize(d)?;
    if value.is_object() {
        Ok(serde_json::from_value(value).ok())
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_page() {
        let raw = r#"{
            "code": 0,
            "message": "0",
            "data": {
                "items": [{"id_str": "1"}],
                "offset": "912",
                "update_baseline": "913",
                "has_more": true
            }
        }"#;
        let resp: FeedResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.is_success());
        let page = resp.data.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.offset, "912");
        assert!(page.has_more);
    }

    #[test]
    fn test_lenient_fields() {
        let raw = r#"{
            "code": "0",
            "data": {"items": null, "offset": 77, "update_baseline": null, "has_more": 1}
        }"#;
        let resp: FeedResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.is_success());
        let page = resp.data.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.offset, "77");
        assert_eq!(page.update_baseline, "");
        assert!(page.has_more);
    }

    #[test]
    fn test_missing_code_is_failure() {
        let resp: FeedResponse = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(!resp.is_success());
    }

    #[test]
    fn test_error_message_fallback() {
        let resp: FeedResponse =
            serde_json::from_str(r#"{"code": -101, "msg": "not logged in", "data": null}"#)
                .unwrap();
        assert_eq!(resp.code, -101);
        assert_eq!(resp.error_message(), "not logged in");
        assert!(resp.data.is_none());

        assert_eq!(FeedResponse::failure(1, "a").error_message(), "a");
    }

    #[test]
    fn test_non_object_data() {
        let resp: FeedResponse = serde_json::from_str(r#"{"code": 0, "data": []}"#).unwrap();
        assert!(resp.is_success());
        assert!(resp.data.is_none());
    }
}
