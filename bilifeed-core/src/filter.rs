//! Post filters and per-author grouping.
//!
//! These run after pagination, on both freshly fetched and cached posts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::PostRecord;

// ============================================================================
// Time Window
// ============================================================================

/// Returns true if `ts` falls inside `[start_ts, end_ts]`.
///
/// A zero bound is open on that side. An unknown timestamp (`0`) never
/// satisfies a non-zero start bound.
pub fn within_range(ts: i64, start_ts: i64, end_ts: i64) -> bool {
    if start_ts != 0 && (ts == 0 || ts < start_ts) {
        return false;
    }
    if end_ts != 0 && ts > end_ts {
        return false;
    }
    true
}

// ============================================================================
// Keyword Match
// ============================================================================

/// Returns true if every whitespace-separated term of `keyword` appears,
/// case-insensitively, in `haystack`. An empty keyword matches everything.
fn match_terms(haystack: &str, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    let haystack = haystack.to_lowercase();
    keyword.split_whitespace().all(|term| haystack.contains(term))
}

/// Keyword filter over title, text and author name.
pub fn match_keyword(post: &PostRecord, keyword: &str) -> bool {
    match_terms(&post.search_text(), keyword)
}

/// Applies the time window, then the keyword filter.
pub fn apply_filters(
    posts: Vec<PostRecord>,
    start_ts: i64,
    end_ts: i64,
    keyword: &str,
) -> Vec<PostRecord> {
    let windowed = start_ts != 0 || end_ts != 0;
    let keyword = keyword.trim();

    posts
        .into_iter()
        .filter(|post| !windowed || within_range(post.published_at, start_ts, end_ts))
        .filter(|post| keyword.is_empty() || match_keyword(post, keyword))
        .collect()
}

// ============================================================================
// Author Grouping
// ============================================================================

/// Sort direction of the author list by post count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthorSort {
    /// Most posts first.
    #[default]
    Desc,
    /// Fewest posts first.
    Asc,
}

impl AuthorSort {
    /// Config / CLI spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desc => "desc",
            Self::Asc => "asc",
        }
    }
}

impl fmt::Display for AuthorSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desc" => Ok(Self::Desc),
            "asc" => Ok(Self::Asc),
            other => Err(CoreError::InvalidOption {
                field: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// One author and the posts collected for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorEntry {
    /// Author id, empty when unknown.
    pub author_id: String,
    /// First display name seen for this author, `-` if none.
    pub author_name: String,
    /// The author's posts, newest first.
    pub posts: Vec<PostRecord>,
}

impl AuthorEntry {
    /// Number of posts.
    pub fn count(&self) -> usize {
        self.posts.len()
    }
}

/// Groups posts by `author_id`, keeping first-seen order before sorting.
///
/// Authors are sorted by post count in the requested direction; the sort is
/// stable, so authors with equal counts stay in first-seen order. Posts of
/// each author are ordered newest first.
pub fn group_by_author(posts: &[PostRecord], sort: AuthorSort) -> Vec<AuthorEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<AuthorEntry> = Vec::new();

    for post in posts {
        let slot = *index.entry(post.author_id.as_str()).or_insert_with(|| {
            let name = if post.author_name.is_empty() {
                "-".to_string()
            } else {
                post.author_name.clone()
            };
            entries.push(AuthorEntry {
                author_id: post.author_id.clone(),
                author_name: name,
                posts: Vec::new(),
            });
            entries.len() - 1
        });
        entries[slot].posts.push(post.clone());
    }

    for entry in &mut entries {
        entry.posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    }

    match sort {
        AuthorSort::Desc => entries.sort_by(|a, b| b.count().cmp(&a.count())),
        AuthorSort::Asc => entries.sort_by_key(AuthorEntry::count),
    }
    entries
}

/// Keeps authors whose `name + id` contains every keyword term.
pub fn match_author_keyword(entries: Vec<AuthorEntry>, keyword: &str) -> Vec<AuthorEntry> {
    if keyword.trim().is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| {
            match_terms(
                &format!("{} {}", entry.author_name, entry.author_id),
                keyword,
            )
        })
        .collect()
}
