//! Media URL collection.

use serde_json::Value;

/// Keys of an object that may point at media.
const MEDIA_KEYS: &[&str] = &["url", "src", "img_src", "img_url", "cover"];

/// Appends every media URL found in `value`, skipping ones already present.
///
/// Strings are taken as-is, arrays are walked in order and objects are
/// searched through [`MEDIA_KEYS`].
pub fn append_media(media: &mut Vec<String>, value: &Value) {
    match value {
        Value::String(url) => {
            if !url.is_empty() && !media.iter().any(|m| m == url) {
                media.push(url.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                append_media(media, item);
            }
        }
        Value::Object(map) => {
            for key in MEDIA_KEYS {
                if let Some(inner) = map.get(*key) {
                    append_media(media, inner);
                }
            }
        }
        _ => {}
    }
}

/// Merges `extra` into `media`, keeping `media` first and unique.
pub fn merge_media(mut media: Vec<String>, extra: Vec<String>) -> Vec<String> {
    for url in extra {
        if !media.contains(&url) {
            media.push(url);
        }
    }
    media
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dedup_preserves_order() {
        let mut media = Vec::new();
        append_media(&mut media, &json!(["b", "a", "b", ""]));
        assert_eq!(media, vec!["b", "a"]);
    }

    #[test]
    fn test_nested_objects() {
        let mut media = Vec::new();
        append_media(
            &mut media,
            &json!([{"src": "x"}, {"img_src": "y", "cover": {"url": "z"}}, {"other": "w"}]),
        );
        assert_eq!(media, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_merge_media() {
        let merged = merge_media(
            vec!["a".to_string(), "b".to_string()],
            vec!["b".to_string(), "c".to_string()],
        );
        assert_eq!(merged, vec!["a", "b", "c"]);
    }
}
