//! Primary and secondary content variants.
//!
//! `module_dynamic.major` and `module_dynamic.additional` each carry at most
//! one of several named sub-objects. The sub-object key selects a variant
//! through a lookup table, and every variant knows how to pull its title,
//! detail text and media out of its body.

use serde_json::Value;

use super::media::append_media;
use super::text::extract_text;

// ============================================================================
// Extracted Parts
// ============================================================================

/// What a content variant contributes to a post record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentParts {
    /// Title of the media object.
    pub title: String,
    /// Free text describing the media object.
    pub detail: String,
    /// Media URLs, unique.
    pub media: Vec<String>,
}

fn title_of(body: &Value) -> String {
    body.get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn media_of(body: &Value, keys: &[&str]) -> Vec<String> {
    let mut media = Vec::new();
    for key in keys {
        if let Some(value) = body.get(*key) {
            append_media(&mut media, value);
        }
    }
    media
}

// ============================================================================
// Primary Content
// ============================================================================

/// Sub-kinds of the primary content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MajorKind {
    /// Video upload.
    Archive,
    /// Video collection season.
    UgcSeason,
    /// Bangumi / PGC episode.
    Pgc,
    /// Column article.
    Article,
    /// Image post.
    Draw,
    /// Audio track.
    Music,
    /// Generic card.
    Common,
    /// Live room.
    Live,
    /// Composite opus post.
    Opus,
}

/// Sub-object key to variant, in detection order.
const MAJOR_TABLE: &[(&str, MajorKind)] = &[
    ("archive", MajorKind::Archive),
    ("ugc_season", MajorKind::UgcSeason),
    ("pgc", MajorKind::Pgc),
    ("article", MajorKind::Article),
    ("draw", MajorKind::Draw),
    ("music", MajorKind::Music),
    ("common", MajorKind::Common),
    ("live", MajorKind::Live),
    ("opus", MajorKind::Opus),
];

impl MajorKind {
    /// The feed's `MAJOR_TYPE_*` tag for this variant.
    pub fn type_tag(self) -> &'static str {
        match self {
            Self::Archive => "MAJOR_TYPE_ARCHIVE",
            Self::UgcSeason => "MAJOR_TYPE_UGC_SEASON",
            Self::Pgc => "MAJOR_TYPE_PGC",
            Self::Article => "MAJOR_TYPE_ARTICLE",
            Self::Draw => "MAJOR_TYPE_DRAW",
            Self::Music => "MAJOR_TYPE_MUSIC",
            Self::Common => "MAJOR_TYPE_COMMON",
            Self::Live => "MAJOR_TYPE_LIVE",
            Self::Opus => "MAJOR_TYPE_OPUS",
        }
    }
}

/// A detected primary content object.
#[derive(Debug, Clone, Copy)]
pub struct MajorContent<'a> {
    /// Which sub-kind was present.
    pub kind: MajorKind,
    body: &'a Value,
}

impl<'a> MajorContent<'a> {
    /// Detects the sub-kind carried by a `major` object.
    pub fn detect(major: &'a Value) -> Option<Self> {
        MAJOR_TABLE.iter().find_map(|(key, kind)| {
            major.get(*key).map(|body| Self { kind: *kind, body })
        })
    }

    /// Extracts title, detail and media.
    pub fn extract(&self) -> ContentParts {
        let body = self.body;
        let media = match self.kind {
            MajorKind::Article => media_of(body, &["covers", "cover"]),
            MajorKind::Opus => media_of(body, &["pics", "cover"]),
            MajorKind::Draw => draw_media(body),
            _ => media_of(body, &["cover"]),
        };
        let title = match self.kind {
            MajorKind::Draw => String::new(),
            _ => title_of(body),
        };

        ContentParts {
            title,
            detail: extract_text(body),
            media,
        }
    }
}

/// Image posts list their pictures under `items[].src`.
fn draw_media(body: &Value) -> Vec<String> {
    let mut media = Vec::new();
    if let Some(items) = body.get("items").and_then(Value::as_array) {
        for item in items {
            match item.get("src") {
                Some(src) if item.is_object() => append_media(&mut media, src),
                None if item.is_object() => {}
                _ => append_media(&mut media, item),
            }
        }
    }
    media
}

// ============================================================================
// Secondary Content
// ============================================================================

/// Sub-kinds of the additional content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdditionalKind {
    /// Attached video.
    Ugc,
    /// Generic card.
    Common,
    /// Attached article.
    Article,
    /// Attached audio.
    Music,
    /// Attached live room.
    Live,
}

const ADDITIONAL_TABLE: &[(&str, AdditionalKind)] = &[
    ("ugc", AdditionalKind::Ugc),
    ("common", AdditionalKind::Common),
    ("article", AdditionalKind::Article),
    ("music", AdditionalKind::Music),
    ("live", AdditionalKind::Live),
];

/// A detected secondary content object.
#[derive(Debug, Clone, Copy)]
pub struct AdditionalContent<'a> {
    /// Which sub-kind was present.
    pub kind: AdditionalKind,
    body: &'a Value,
}

impl<'a> AdditionalContent<'a> {
    /// Detects the sub-kind carried by an `additional` object.
    pub fn detect(additional: &'a Value) -> Option<Self> {
        ADDITIONAL_TABLE.iter().find_map(|(key, kind)| {
            additional.get(*key).map(|body| Self { kind: *kind, body })
        })
    }

    /// Extracts title, detail and media.
    pub fn extract(&self) -> ContentParts {
        let media = match self.kind {
            AdditionalKind::Article => media_of(self.body, &["covers", "cover"]),
            _ => media_of(self.body, &["cover"]),
        };
        ContentParts {
            title: title_of(self.body),
            detail: extract_text(self.body),
            media,
        }
    }
}
