//! Payload normalizer.
//!
//! Converts one raw feed item into a [`PostRecord`]. The feed schema is
//! undocumented and varies by dynamic type, so every lookup is optional and
//! a missing or malformed field only empties the matching output field.
//!
//! ## Submodules
//!
//! - [`text`] - Recursive text extraction
//! - [`media`] - Media URL collection
//! - [`variant`] - Primary/secondary content variants

pub mod media;
pub mod text;
pub mod variant;

use serde_json::Value;

use crate::models::PostRecord;
use media::merge_media;
use text::extract_text;
use variant::{AdditionalContent, ContentParts, MajorContent};

/// Normalizes one raw feed item. Never fails.
pub fn normalize_item(item: &Value) -> PostRecord {
    let modules = item.get("modules").unwrap_or(&Value::Null);
    let author = modules.get("module_author").unwrap_or(&Value::Null);
    let dynamic = modules.get("module_dynamic").unwrap_or(&Value::Null);

    let desc = dynamic.get("desc").map(extract_text).unwrap_or_default();

    let major_value = dynamic.get("major").unwrap_or(&Value::Null);
    let major = MajorContent::detect(major_value);
    let major_parts = major.map(|m| m.extract()).unwrap_or_default();
    let additional = dynamic
        .get("additional")
        .and_then(AdditionalContent::detect)
        .map(|a| a.extract())
        .unwrap_or_default();

    let kind = non_empty_str(major_value.get("type"))
        .map(str::to_string)
        .or_else(|| major.map(|m| m.kind.type_tag().to_string()))
        .unwrap_or_default();

    let id = dynamic_id(item);

    PostRecord {
        url: PostRecord::permalink(&id),
        id,
        feed_type: non_empty_str(item.get("type")).unwrap_or_default().to_string(),
        author_name: non_empty_str(author.get("name"))
            .unwrap_or_default()
            .to_string(),
        author_id: id_string(author.get("mid")),
        text: merge_text(&[desc.as_str(), major_parts.detail.as_str(), additional.detail.as_str()]),
        kind,
        title: pick_title(&major_parts, &additional),
        media: merge_media(major_parts.media, additional.media),
        published_at: publish_timestamp(item),
        reshared_from: item
            .get("orig")
            .filter(|orig| orig.as_object().is_some_and(|m| !m.is_empty()))
            .map(|orig| Box::new(normalize_item(orig))),
    }
}

/// Joins the non-empty parts with newlines, dropping exact duplicates.
fn merge_text(parts: &[&str]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for part in parts {
        if !part.is_empty() && !seen.contains(part) {
            seen.push(*part);
        }
    }
    seen.join("\n").trim().to_string()
}

fn pick_title(major: &ContentParts, additional: &ContentParts) -> String {
    if major.title.is_empty() {
        additional.title.clone()
    } else {
        major.title.clone()
    }
}

/// Prefers the string id, then stringifies the numeric one.
fn dynamic_id(item: &Value) -> String {
    if let Some(id) = non_empty_str(item.get("id_str")) {
        return id.to_string();
    }
    id_string(item.get("id"))
}

/// Reads the publish time from the author module, then the item itself.
fn publish_timestamp(item: &Value) -> i64 {
    let author = item
        .get("modules")
        .and_then(|m| m.get("module_author"))
        .unwrap_or(&Value::Null);

    [author.get("pub_ts"), author.get("pub_time"), item.get("pub_ts")]
        .into_iter()
        .flatten()
        .find_map(as_timestamp)
        .unwrap_or(0)
}

/// Non-zero integer, or a string holding one.
fn as_timestamp(value: &Value) -> Option<i64> {
    let ts = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (ts != 0).then_some(ts)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Renders an id that may be a string or a number; zero counts as missing.
fn id_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_i64() != Some(0) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_text_dedup() {
        assert_eq!(merge_text(&["a", "", "b", "a"]), "a\nb");
        assert_eq!(merge_text(&["", "", ""]), "");
    }

    #[test]
    fn test_dynamic_id_prefers_string() {
        assert_eq!(dynamic_id(&json!({"id_str": "77", "id": 1})), "77");
        assert_eq!(dynamic_id(&json!({"id_str": "", "id": 12})), "12");
        assert_eq!(dynamic_id(&json!({})), "");
    }

    #[test]
    fn test_publish_timestamp_order() {
        let item = json!({
            "pub_ts": 3,
            "modules": {"module_author": {"pub_ts": 0, "pub_time": "2 hours ago"}}
        });
        assert_eq!(publish_timestamp(&item), 3);

        let item = json!({"modules": {"module_author": {"pub_ts": "1700000000"}}});
        assert_eq!(publish_timestamp(&item), 1_700_000_000);

        assert_eq!(publish_timestamp(&json!({})), 0);
    }

    #[test]
    fn test_kind_falls_back_to_variant_tag() {
        let item = json!({
            "modules": {"module_dynamic": {"major": {"draw": {"items": []}}}}
        });
        assert_eq!(normalize_item(&item).kind, "MAJOR_TYPE_DRAW");
    }
}
