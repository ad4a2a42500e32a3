//! Summary report types.
//!
//! A [`SummaryReport`] is what the summary pipeline hands back to the
//! presentation layer. It always carries something displayable: when a
//! provider fails, `sentences` holds the local extractive summary and
//! `error`/`error_detail` explain what happened.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::post::PostRecord;

// ============================================================================
// Sources and Sentences
// ============================================================================

/// A post selected as a summary source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySource {
    /// 1-based reference index.
    pub index: usize,
    /// The post itself.
    pub post: PostRecord,
    /// Short display snippet.
    pub snippet: String,
    /// Formatted publish time.
    pub time: String,
}

/// One summary sentence and the sources it cites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySentence {
    /// The sentence text.
    pub sentence: String,
    /// 1-based source indices, no duplicates.
    pub refs: Vec<usize>,
}

impl SummarySentence {
    /// Creates a new sentence.
    pub fn new(sentence: impl Into<String>, refs: Vec<usize>) -> Self {
        Self {
            sentence: sentence.into(),
            refs,
        }
    }
}

// ============================================================================
// Error Tags
// ============================================================================

/// Machine-readable reasons a summary fell back to the local path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryErrorKind {
    /// No posts to summarize.
    NoData,
    /// Provider needs an API key and none was supplied.
    MissingApiKey,
    /// Custom endpoint selected without a base URL.
    MissingBaseUrl,
    /// Provider name not recognized.
    UnknownProvider,
    /// The model answered without any usable grounded sentence.
    BadAiResponse,
    /// The provider call timed out.
    RequestTimeout,
    /// The provider call failed.
    RequestFailed,
}

impl SummaryErrorKind {
    /// Tag stored in [`SummaryReport::error`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::MissingApiKey => "missing_api_key",
            Self::MissingBaseUrl => "missing_base_url",
            Self::UnknownProvider => "unknown_provider",
            Self::BadAiResponse => "bad_ai_response",
            Self::RequestTimeout => "request_timeout",
            Self::RequestFailed => "request_failed",
        }
    }
}

impl fmt::Display for SummaryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Summary Report
// ============================================================================

/// Outcome of one summary run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Provider actually used; `local` after any failure.
    pub provider: String,
    /// Numbered sources, newest first.
    pub sources: Vec<SummarySource>,
    /// Grounded sentences.
    pub sentences: Vec<SummarySentence>,
    /// Empty on success, otherwise a [`SummaryErrorKind`] tag.
    pub error: String,
    /// Redacted, length-capped error description.
    pub error_detail: String,
}

impl SummaryReport {
    /// Returns true if no error was recorded.
    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }

    /// Returns the source with the given 1-based index.
    pub fn source(&self, index: usize) -> Option<&SummarySource> {
        self.sources.iter().find(|s| s.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_tags() {
        assert_eq!(SummaryErrorKind::BadAiResponse.as_str(), "bad_ai_response");
        assert_eq!(
            serde_json::to_string(&SummaryErrorKind::MissingApiKey).unwrap(),
            "\"missing_api_key\""
        );
    }

    #[test]
    fn test_report_source_lookup() {
        let report = SummaryReport {
            provider: "local".to_string(),
            sources: vec![SummarySource {
                index: 1,
                post: PostRecord::default(),
                snippet: "-".to_string(),
                time: "-".to_string(),
            }],
            ..Default::default()
        };
        assert!(report.is_ok());
        assert!(report.source(1).is_some());
        assert!(report.source(2).is_none());
    }
}
