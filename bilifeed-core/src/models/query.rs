//! Query shape types.
//!
//! A [`QueryShape`] captures every input that changes what the feed returns,
//! so the cache can tell two fetches apart.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Feed Type
// ============================================================================

/// Feed category requested from the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    /// Every dynamic.
    #[default]
    All,
    /// Video uploads only.
    Video,
    /// Bangumi / PGC updates only.
    Pgc,
    /// Articles only.
    Article,
}

impl FeedType {
    /// Value sent as the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Video => "video",
            Self::Pgc => "pgc",
            Self::Article => "article",
        }
    }

    /// Returns all feed types.
    pub fn all() -> &'static [FeedType] {
        &[Self::All, Self::Video, Self::Pgc, Self::Article]
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(CoreError::InvalidOption {
                field: "type",
                value: s,
            })
    }
}

// ============================================================================
// Query Mode
// ============================================================================

/// Whether to keep every author or only a selected set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Keep dynamics from every followed author.
    #[default]
    All,
    /// Keep only dynamics whose author id is in the target set.
    SelectedUp,
}

impl QueryMode {
    /// Config / CLI spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::SelectedUp => "selected_up",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "selected_up" => Ok(Self::SelectedUp),
            other => Err(CoreError::InvalidOption {
                field: "query_mode",
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Target Author List
// ============================================================================

/// Normalizes a free-form author id list to `a,b,c`.
///
/// Accepts `,`, `;`, `|`, spaces and newlines as separators and drops
/// duplicates while keeping first-seen order.
pub fn normalize_mid_list(raw: &str) -> String {
    let mut seen = HashSet::new();
    raw.split(|c: char| matches!(c, ',' | ';' | '|') || c.is_whitespace())
        .map(str::trim)
        .filter(|mid| !mid.is_empty() && seen.insert(*mid))
        .collect::<Vec<_>>()
        .join(",")
}

// ============================================================================
// Query Shape
// ============================================================================

/// Every input that determines which posts a fetch returns.
///
/// The auth fields are part of the shape on purpose: cache entries are never
/// shared between different sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QueryShape {
    /// Feed category.
    pub feed_type: FeedType,
    /// Query mode.
    pub query_mode: QueryMode,
    /// Normalized comma-separated target author ids.
    pub target_up_mids: String,
    /// Maximum number of pages.
    pub pages: u32,
    /// Feed endpoint URL.
    pub endpoint: String,
    /// Feature-flag string.
    pub features: String,
    /// Location tag.
    pub web_location: String,
    /// `SESSDATA` cookie value actually sent.
    pub sessdata: String,
    /// Raw `Cookie` entry actually sent, if any.
    pub cookie: String,
}

impl QueryShape {
    /// Parsed target author set.
    pub fn target_set(&self) -> HashSet<String> {
        normalize_mid_list(&self.target_up_mids)
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Returns true when per-author filtering applies.
    ///
    /// A `selected_up` query with an empty target list behaves like `all`.
    pub fn filters_authors(&self) -> bool {
        self.query_mode == QueryMode::SelectedUp && !self.target_set().is_empty()
    }
}
