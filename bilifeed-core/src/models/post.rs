//! The normalized post record.

use serde::{Deserialize, Serialize};

/// Base URL used to build a dynamic's permalink.
pub(crate) const PERMALINK_BASE: &str = "https://t.bilibili.com/";

/// One dynamic, flattened out of the feed's nested payload.
///
/// Every field degrades to an empty value when the source item does not
/// carry it; `published_at == 0` means the publish time is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostRecord {
    /// Stable identifier of the dynamic.
    pub id: String,

    /// Feed category (`DYNAMIC_TYPE_*`).
    #[serde(rename = "type")]
    pub feed_type: String,

    /// Display name of the author.
    pub author_name: String,

    /// Author id (`mid`), empty if unknown.
    pub author_id: String,

    /// Description and media details, deduplicated and newline-joined.
    pub text: String,

    /// Tag of the primary media type (`MAJOR_TYPE_*`), may be empty.
    pub kind: String,

    /// Title of the primary (or secondary) media object.
    pub title: String,

    /// Media URLs without duplicates, primary media first.
    pub media: Vec<String>,

    /// Canonical permalink, empty when the id is unknown.
    pub url: String,

    /// Publish time in epoch seconds, 0 if unknown.
    pub published_at: i64,

    /// The wrapped original when this dynamic is a reshare.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reshared_from: Option<Box<PostRecord>>,
}

impl PostRecord {
    /// Builds the permalink for a dynamic id.
    pub fn permalink(id: &str) -> String {
        if id.is_empty() {
            String::new()
        } else {
            format!("{PERMALINK_BASE}{id}")
        }
    }

    /// Returns true if the publish time is known.
    pub fn has_timestamp(&self) -> bool {
        self.published_at != 0
    }

    /// Haystack used by the keyword filter: title, text and author name.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.text, self.author_name).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permalink() {
        assert_eq!(
            PostRecord::permalink("912345678"),
            "https://t.bilibili.com/912345678"
        );
        assert_eq!(PostRecord::permalink(""), "");
    }

    #[test]
    fn test_search_text_is_lowercase() {
        let post = PostRecord {
            title: "Cat Video".to_string(),
            text: "Hello".to_string(),
            author_name: "UP".to_string(),
            ..Default::default()
        };
        assert_eq!(post.search_text(), "cat video hello up");
    }
}
