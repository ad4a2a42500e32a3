//! Recursive free-text extraction.

use serde_json::Value;

/// Keys that may carry text, in lookup order.
const TEXT_KEYS: &[&str] = &[
    "text",
    "desc",
    "summary",
    "content",
    "intro",
    "sub_title",
    "subtitle",
    "description",
];

/// Extracts the first meaningful text from an arbitrary JSON value.
///
/// - strings are trimmed
/// - arrays join their non-empty extractions with a space
/// - objects return the first non-empty candidate key, then fall back to
///   `rich_text_nodes` (`text` or `raw_text` of each node)
/// - everything else yields an empty string
pub fn extract_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(extract_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string(),
        Value::Object(map) => {
            for key in TEXT_KEYS {
                if let Some(inner) = map.get(*key) {
                    let text = extract_text(inner);
                    if !text.is_empty() {
                        return text;
                    }
                }
            }
            map.get("rich_text_nodes")
                .and_then(Value::as_array)
                .map(|nodes| rich_text(nodes))
                .unwrap_or_default()
        }
        _ => String::new(),
    }
}

fn rich_text(nodes: &[Value]) -> String {
    nodes
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|node| {
            ["text", "raw_text"]
                .iter()
                .filter_map(|key| node.get(*key).and_then(Value::as_str))
                .find(|s| !s.is_empty())
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_is_trimmed() {
        assert_eq!(extract_text(&json!("  hi  ")), "hi");
    }

    #[test]
    fn test_candidate_key_order() {
        let value = json!({"desc": "second", "text": "first"});
        assert_eq!(extract_text(&value), "first");
    }

    #[test]
    fn test_empty_candidate_falls_through() {
        let value = json!({"text": "", "summary": {"content": "deep"}});
        assert_eq!(extract_text(&value), "deep");
    }

    #[test]
    fn test_list_joins_non_empty() {
        let value = json!(["a", "", {"text": "b"}, 3]);
        assert_eq!(extract_text(&value), "a b");
    }

    #[test]
    fn test_rich_text_nodes() {
        let value = json!({
            "rich_text_nodes": [
                {"text": "hello"},
                {"raw_text": "world"},
                {"type": "emoji"},
                "skip"
            ]
        });
        assert_eq!(extract_text(&value), "hello world");
    }

    #[test]
    fn test_non_text_values() {
        assert_eq!(extract_text(&json!(null)), "");
        assert_eq!(extract_text(&json!(42)), "");
        assert_eq!(extract_text(&json!({"title": "no text key"})), "");
    }
}
