//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;

use bilifeed_core::{AuthorEntry, PostRecord, SummaryReport};

// ============================================================================
// Output Types
// ============================================================================

/// One author with a post count.
#[derive(Debug, Serialize)]
pub struct AuthorOutput<'a> {
    pub author_id: &'a str,
    pub author_name: &'a str,
    pub count: usize,
}

/// One author with their posts.
#[derive(Debug, Serialize)]
pub struct AuthorPostsOutput<'a> {
    #[serde(flatten)]
    pub author: AuthorOutput<'a>,
    pub posts: &'a [PostRecord],
}

/// Result of a fetch run.
#[derive(Debug, Serialize)]
pub struct FeedOutput<'a> {
    pub total: usize,
    pub authors: Vec<AuthorPostsOutput<'a>>,
}

/// A summary report and the author it covers.
#[derive(Debug, Serialize)]
pub struct SummaryOutput<'a> {
    pub author_id: &'a str,
    pub author_name: &'a str,
    #[serde(flatten)]
    pub report: &'a SummaryReport,
}

impl<'a> From<&'a AuthorEntry> for AuthorOutput<'a> {
    fn from(entry: &'a AuthorEntry) -> Self {
        Self {
            author_id: &entry.author_id,
            author_name: &entry.author_name,
            count: entry.count(),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the author list.
    pub fn format_authors(&self, entries: &[AuthorEntry]) -> Result<String> {
        let authors: Vec<AuthorOutput<'_>> = entries.iter().map(AuthorOutput::from).collect();
        self.format(&authors)
    }

    /// Formats posts grouped per author.
    pub fn format_feed(&self, entries: &[AuthorEntry]) -> Result<String> {
        let output = FeedOutput {
            total: entries.iter().map(AuthorEntry::count).sum(),
            authors: entries
                .iter()
                .map(|entry| AuthorPostsOutput {
                    author: AuthorOutput::from(entry),
                    posts: &entry.posts,
                })
                .collect(),
        };
        self.format(&output)
    }

    /// Formats a summary report.
    pub fn format_summary(
        &self,
        report: &SummaryReport,
        author_id: &str,
        author_name: &str,
    ) -> Result<String> {
        self.format(&SummaryOutput {
            author_id,
            author_name,
            report,
        })
    }
}
