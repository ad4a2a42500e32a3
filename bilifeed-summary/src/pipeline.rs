//! Summary pipeline.
//!
//! ```text
//! posts ─► select_sources ─► provider? ─► prompt ─► complete ─► extract ─► validate
//!                              │                        │                     │
//!                              └── local ◄── failure ◄──┴─────── empty ◄──────┘
//! ```
//!
//! Every branch yields a [`SummaryReport`]. Failures keep the sources, put
//! the local extractive summary in `sentences`, and describe the problem in
//! `error`/`error_detail`.

use std::collections::BTreeMap;
use std::time::Duration;

use bilifeed_core::{
    Localizer, PostRecord, SummaryErrorKind, SummaryReport, SummarySentence, SummarySource,
};
use tracing::{info, instrument, warn};

use crate::error::ProviderError;
use crate::extract::extract_json;
use crate::local::local_summary;
use crate::prompt::build_prompt;
use crate::provider::SummaryProvider;
use crate::redact::trim_error;
use crate::registry::{ProviderKind, ProviderRegistry};
use crate::sources::select_sources;
use crate::validate::normalize_summary;

/// Provider name recorded whenever the local summary is shown.
pub const LOCAL_PROVIDER: &str = "local";

/// Summary provider selection and limits.
#[derive(Clone, PartialEq)]
pub struct SummaryOptions {
    /// `local`, `openai`, `custom_openai` or `gemini`.
    pub provider: String,
    /// `chat_completions` or `responses`.
    pub api_mode: String,
    /// Model, empty for the provider default.
    pub model: String,
    /// Provider API key.
    pub api_key: String,
    /// Base URL for OpenAI-compatible endpoints.
    pub base_url: String,
    /// Ask chat completions for a JSON object.
    pub use_json_format: bool,
    /// Extra request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Maximum sources, at least one is always used.
    pub max_items: usize,
    /// Provider request timeout.
    pub timeout: Duration,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            provider: LOCAL_PROVIDER.to_string(),
            api_mode: "chat_completions".to_string(),
            model: String::new(),
            api_key: String::new(),
            base_url: String::new(),
            use_json_format: true,
            extra_headers: BTreeMap::new(),
            max_items: 80,
            timeout: Duration::from_secs(45),
        }
    }
}

impl std::fmt::Debug for SummaryOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryOptions")
            .field("provider", &self.provider)
            .field("api_mode", &self.api_mode)
            .field("model", &self.model)
            .field("api_key", &bilifeed_core::mask(&self.api_key))
            .field("base_url", &self.base_url)
            .field("max_items", &self.max_items)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Summarizes one author's posts.
///
/// Never fails; see the module docs for how problems are reported.
#[instrument(skip_all, fields(posts = posts.len(), provider = %options.provider))]
pub async fn summarize_user_dynamics(
    posts: &[PostRecord],
    options: &SummaryOptions,
    lang: &Localizer,
) -> SummaryReport {
    let sources = select_sources(posts, options.max_items);
    if sources.is_empty() {
        return SummaryReport {
            provider: LOCAL_PROVIDER.to_string(),
            error: SummaryErrorKind::NoData.as_str().to_string(),
            error_detail: "No source dynamics found.".to_string(),
            ..Default::default()
        };
    }

    let Some(kind) = ProviderKind::parse(&options.provider) else {
        let name = options.provider.trim().to_lowercase();
        return fallback(sources, lang, &ProviderError::UnknownProvider(name));
    };

    match ProviderRegistry::build(kind, options) {
        Ok(Some(provider)) => summarize_with(provider.as_ref(), sources, lang).await,
        Ok(None) => {
            let sentences = local_summary(&sources, lang);
            success(LOCAL_PROVIDER, sources, sentences)
        }
        Err(e) => fallback(sources, lang, &e),
    }
}

/// Runs `provider` over already selected sources.
///
/// An answer without a single grounded sentence is reported as
/// `bad_ai_response` with the raw answer as detail.
pub async fn summarize_with(
    provider: &dyn SummaryProvider,
    sources: Vec<SummarySource>,
    lang: &Localizer,
) -> SummaryReport {
    if sources.is_empty() {
        return SummaryReport {
            provider: LOCAL_PROVIDER.to_string(),
            error: SummaryErrorKind::NoData.as_str().to_string(),
            error_detail: "No source dynamics found.".to_string(),
            ..Default::default()
        };
    }

    let prompt = build_prompt(&sources);
    let raw = match provider.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => return fallback(sources, lang, &e),
    };

    let sentences = normalize_summary(&extract_json(&raw), sources.len());
    if sentences.is_empty() {
        warn!(provider = provider.name(), "No grounded sentences in model answer");
        let mut report = local_report(sources, lang);
        report.error = SummaryErrorKind::BadAiResponse.as_str().to_string();
        report.error_detail = trim_error(&raw);
        return report;
    }

    info!(provider = provider.name(), sentences = sentences.len(), "Summary ready");
    success(provider.name(), sources, sentences)
}

fn success(
    provider: &str,
    sources: Vec<SummarySource>,
    sentences: Vec<SummarySentence>,
) -> SummaryReport {
    SummaryReport {
        provider: provider.to_string(),
        sources,
        sentences,
        error: String::new(),
        error_detail: String::new(),
    }
}

fn local_report(sources: Vec<SummarySource>, lang: &Localizer) -> SummaryReport {
    let sentences = local_summary(&sources, lang);
    success(LOCAL_PROVIDER, sources, sentences)
}

fn fallback(sources: Vec<SummarySource>, lang: &Localizer, error: &ProviderError) -> SummaryReport {
    let kind = error.kind();
    warn!(error = kind.as_str(), "Falling back to local summary");
    let mut report = local_report(sources, lang);
    report.error = kind.as_str().to_string();
    report.error_detail = trim_error(&error.to_string());
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, ts: i64, title: &str) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            published_at: ts,
            title: title.to_string(),
            kind: "MAJOR_TYPE_ARCHIVE".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_data() {
        let report =
            summarize_user_dynamics(&[], &SummaryOptions::default(), &Localizer::default()).await;
        assert_eq!(report.error, "no_data");
        assert_eq!(report.error_detail, "No source dynamics found.");
        assert_eq!(report.provider, "local");
        assert!(report.sources.is_empty());
        assert!(report.sentences.is_empty());
    }

    #[tokio::test]
    async fn test_local_provider_aliases() {
        for name in ["local", "", "none", " NONE "] {
            let options = SummaryOptions {
                provider: name.to_string(),
                ..Default::default()
            };
            let report =
                summarize_user_dynamics(&[post("1", 10, "T")], &options, &Localizer::default())
                    .await;
            assert!(report.is_ok(), "{name}");
            assert_eq!(report.provider, "local");
            assert!(!report.sentences.is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let options = SummaryOptions {
            provider: "openai".to_string(),
            ..Default::default()
        };
        let report =
            summarize_user_dynamics(&[post("1", 10, "T")], &options, &Localizer::default()).await;

        assert_eq!(report.error, "missing_api_key");
        assert_eq!(report.error_detail, "Missing API key in summary settings.");
        assert_eq!(report.provider, "local");
        assert_eq!(report.sources.len(), 1);
        assert!(!report.sentences.is_empty());
    }

    #[tokio::test]
    async fn test_missing_base_url() {
        let options = SummaryOptions {
            provider: "custom_openai".to_string(),
            api_key: "sk-abc".to_string(),
            ..Default::default()
        };
        let report =
            summarize_user_dynamics(&[post("1", 10, "T")], &options, &Localizer::default()).await;

        assert_eq!(report.error, "missing_base_url");
        assert_eq!(
            report.error_detail,
            "Missing base_url for custom_openai provider."
        );
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let options = SummaryOptions {
            provider: "Claude".to_string(),
            ..Default::default()
        };
        let report =
            summarize_user_dynamics(&[post("1", 10, "T")], &options, &Localizer::default()).await;

        assert_eq!(report.error, "unknown_provider");
        assert_eq!(report.error_detail, "Unknown provider: claude");
        assert_eq!(report.provider, "local");
    }

    #[test]
    fn test_debug_masks_key() {
        let options = SummaryOptions {
            api_key: "sk-supersecretvalue".to_string(),
            ..Default::default()
        };
        assert!(!format!("{options:?}").contains("supersecret"));
    }
}
