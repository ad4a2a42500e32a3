//! Shared command-line flags and how they merge over the settings file.
//!
//! Flags win over settings. Numeric flags only override when they carry a
//! usable value (`> 0` for counts and timeouts, `>= 0` for pacing), the
//! merged settings are clamped afterwards.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;
use tracing::warn;

use bilifeed_core::{AuthorSort, FeedType, Localizer, QueryMode, parse_time_input};
use bilifeed_fetch::{Credentials, FetchOptions};
use bilifeed_store::{Settings, SummarySettings, ViewMode};
use bilifeed_summary::SummaryOptions;

/// Accepted time formats, shown in error messages.
const TIME_FORMAT_HINT: &str = "YYYY-MM-DD[ HH:MM[:SS]]";

// ============================================================================
// Fetch Flags
// ============================================================================

/// Flags shared by every command that fetches the feed.
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Full browser cookie string.
    #[arg(long)]
    pub cookie: Option<String>,

    /// SESSDATA cookie value.
    #[arg(long)]
    pub sessdata: Option<String>,

    /// DedeUserID cookie value.
    #[arg(long)]
    pub dedeuserid: Option<String>,

    /// `bili_jct` cookie value.
    #[arg(long)]
    pub bili_jct: Option<String>,

    /// Feed type: all, video, pgc, article.
    #[arg(long = "type")]
    pub feed_type: Option<FeedType>,

    /// Query mode: all or `selected_up`.
    #[arg(long)]
    pub query_mode: Option<QueryMode>,

    /// Author ids kept in `selected_up` mode (comma separated).
    #[arg(long)]
    pub target_up_mids: Option<String>,

    /// Maximum pages to fetch.
    #[arg(long)]
    pub pages: Option<u32>,

    /// Ask before fetching each further page.
    #[arg(long)]
    pub interactive: bool,

    /// Feed endpoint URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Feature flags sent with each request.
    #[arg(long)]
    pub features: Option<String>,

    /// Location tag sent with each request.
    #[arg(long)]
    pub web_location: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Window start, YYYY-MM-DD[ HH:MM[:SS]].
    #[arg(long)]
    pub from: Option<String>,

    /// Window end, YYYY-MM-DD[ HH:MM[:SS]] (a bare date means end of day).
    #[arg(long)]
    pub to: Option<String>,

    /// Keep posts whose text contains every term.
    #[arg(long)]
    pub keyword: Option<String>,

    /// Use the result cache.
    #[arg(long, conflicts_with = "no_cache")]
    pub cache: bool,

    /// Bypass the result cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Cache lifetime in minutes.
    #[arg(long)]
    pub cache_ttl: Option<i64>,

    /// Seconds to wait between pages.
    #[arg(long)]
    pub request_interval: Option<f64>,

    /// Retries after a failed page request.
    #[arg(long)]
    pub request_retries: Option<u32>,

    /// First retry delay in seconds.
    #[arg(long)]
    pub request_retry_backoff: Option<f64>,

    /// Retry delay multiplier (at least 1.0).
    #[arg(long)]
    pub request_retry_factor: Option<f64>,

    /// Save cookie and SESSDATA given on the command line.
    #[arg(long, conflicts_with = "no_auto_save_auth")]
    pub auto_save_auth: bool,

    /// Never save auth material.
    #[arg(long)]
    pub no_auto_save_auth: bool,

    /// Author order: desc or asc by post count.
    #[arg(long)]
    pub sort: Option<AuthorSort>,

    /// Record listing: summary or detail.
    #[arg(long)]
    pub view: Option<ViewMode>,

    /// Records per listing page.
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl FetchArgs {
    /// Writes the given flags over `settings` and clamps the result.
    pub fn apply(&self, settings: &mut Settings) {
        override_text(&mut settings.cookie, self.cookie.as_deref());
        override_text(&mut settings.sessdata, self.sessdata.as_deref());

        if self.cache {
            settings.cache = true;
        } else if self.no_cache {
            settings.cache = false;
        }
        if let Some(ttl) = self.cache_ttl.filter(|v| *v > 0) {
            settings.cache_ttl_minutes = ttl;
        }
        if self.auto_save_auth {
            settings.auto_save_auth = true;
        } else if self.no_auto_save_auth {
            settings.auto_save_auth = false;
        }

        let d = &mut settings.defaults;
        if let Some(feed_type) = self.feed_type {
            d.feed_type = feed_type;
        }
        if let Some(mode) = self.query_mode {
            d.query_mode = mode;
        }
        if let Some(mids) = &self.target_up_mids {
            d.target_up_mids.clone_from(mids);
        }
        if let Some(pages) = self.pages.filter(|v| *v > 0) {
            d.pages = pages;
        }
        d.interactive |= self.interactive;
        override_text(&mut d.endpoint, self.endpoint.as_deref());
        override_text(&mut d.features, self.features.as_deref());
        override_text(&mut d.web_location, self.web_location.as_deref());
        if let Some(timeout) = self.timeout.filter(|v| *v > 0) {
            d.timeout_seconds = timeout;
        }
        if let Some(from) = &self.from {
            d.time_from.clone_from(from);
        }
        if let Some(to) = &self.to {
            d.time_to.clone_from(to);
        }
        if let Some(keyword) = &self.keyword {
            d.keyword.clone_from(keyword);
        }
        if let Some(sort) = self.sort {
            d.sort = sort;
        }
        if let Some(view) = self.view {
            d.view = view;
        }
        if let Some(size) = self.page_size.filter(|v| *v > 0) {
            d.page_size = size;
        }

        let f = &mut settings.fetch;
        if let Some(interval) = self.request_interval.filter(|v| *v >= 0.0) {
            f.request_interval_seconds = interval;
        }
        if let Some(retries) = self.request_retries {
            f.max_retries = retries;
        }
        if let Some(backoff) = self.request_retry_backoff.filter(|v| *v >= 0.0) {
            f.retry_backoff_seconds = backoff;
        }
        if let Some(factor) = self.request_retry_factor.filter(|v| *v >= 0.0) {
            f.retry_backoff_factor = factor.max(1.0);
        }

        settings.clamp();
    }

    /// Credentials from merged settings plus the flag-only cookie fields.
    pub fn credentials(&self, settings: &Settings) -> Credentials {
        Credentials {
            cookie: settings.cookie.clone(),
            sessdata: settings.sessdata.clone(),
            dedeuserid: self.dedeuserid.clone().unwrap_or_default(),
            bili_jct: self.bili_jct.clone().unwrap_or_default(),
        }
    }

    /// Fetch options for merged settings, including the time window.
    ///
    /// # Errors
    ///
    /// Returns a localized message when a window bound cannot be parsed.
    pub fn fetch_options(settings: &Settings, lang: &Localizer) -> Result<FetchOptions> {
        let d = &settings.defaults;
        Ok(FetchOptions {
            start_ts: parse_bound(&d.time_from, false, lang)?,
            end_ts: parse_bound(&d.time_to, true, lang)?,
            ..FetchOptions::from_settings(settings)
        })
    }
}

fn parse_bound(value: &str, is_end: bool, lang: &Localizer) -> Result<i64> {
    match parse_time_input(value, is_end) {
        Ok(ts) => Ok(ts),
        Err(_) => bail!(
            "{}",
            lang.t(
                "time_format_error",
                &[("value", value.trim()), ("fmt", TIME_FORMAT_HINT)]
            )
        ),
    }
}

fn override_text(target: &mut String, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        *target = value.to_string();
    }
}

// ============================================================================
// Summary Flags
// ============================================================================

/// Summary provider flags.
#[derive(Args, Debug, Clone, Default)]
pub struct SummaryFlags {
    /// Provider: local, openai, `custom_openai`, gemini.
    #[arg(long)]
    pub summary_provider: Option<String>,

    /// OpenAI API mode: `chat_completions` or responses.
    #[arg(long)]
    pub summary_api_mode: Option<String>,

    /// Model name (provider default when empty).
    #[arg(long)]
    pub summary_model: Option<String>,

    /// Provider API key.
    #[arg(long)]
    pub summary_api_key: Option<String>,

    /// Base URL for OpenAI-compatible endpoints.
    #[arg(long)]
    pub summary_base_url: Option<String>,

    /// Ask the model for a JSON object.
    #[arg(long, conflicts_with = "summary_no_json_format")]
    pub summary_use_json_format: bool,

    /// Do not ask the model for a JSON object.
    #[arg(long)]
    pub summary_no_json_format: bool,

    /// Extra request headers as a JSON object.
    #[arg(long)]
    pub summary_extra_headers: Option<String>,

    /// Maximum posts sent to the provider.
    #[arg(long)]
    pub summary_max_items: Option<usize>,

    /// Provider timeout in seconds.
    #[arg(long)]
    pub summary_timeout: Option<u64>,
}

impl SummaryFlags {
    /// Writes the given flags over the summary settings.
    pub fn apply(&self, summary: &mut SummarySettings) {
        override_text(&mut summary.provider, self.summary_provider.as_deref());
        override_text(&mut summary.api_mode, self.summary_api_mode.as_deref());
        override_text(&mut summary.model, self.summary_model.as_deref());
        override_text(&mut summary.api_key, self.summary_api_key.as_deref());
        override_text(&mut summary.base_url, self.summary_base_url.as_deref());

        if self.summary_use_json_format {
            summary.use_json_format = true;
        } else if self.summary_no_json_format {
            summary.use_json_format = false;
        }
        if let Some(raw) = &self.summary_extra_headers {
            match parse_headers(raw) {
                Some(headers) => summary.extra_headers = headers,
                None => warn!("Ignoring --summary-extra-headers: expected a JSON object"),
            }
        }
        if let Some(max) = self.summary_max_items.filter(|v| *v > 0) {
            summary.max_items = max;
        }
        if let Some(timeout) = self.summary_timeout.filter(|v| *v > 0) {
            summary.timeout_seconds = timeout;
        }

        summary.max_items = summary.max_items.max(1);
        summary.timeout_seconds = summary.timeout_seconds.max(5);
    }
}

/// Pipeline options for merged summary settings.
pub fn summary_options(summary: &SummarySettings) -> SummaryOptions {
    SummaryOptions {
        provider: summary.provider.clone(),
        api_mode: summary.api_mode.clone(),
        model: summary.model.clone(),
        api_key: summary.api_key.clone(),
        base_url: summary.base_url.clone(),
        use_json_format: summary.use_json_format,
        extra_headers: summary.extra_headers.clone(),
        max_items: summary.max_items,
        timeout: Duration::from_secs(summary.timeout_seconds),
    }
}

fn parse_headers(raw: &str) -> Option<BTreeMap<String, String>> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
        return None;
    };
    Some(
        map.into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> FetchArgs {
        FetchArgs::default()
    }

    #[test]
    fn test_no_flags_keeps_settings() {
        let mut settings = Settings::default();
        settings.sessdata = "saved".to_string();
        settings.defaults.pages = 3;

        args().apply(&mut settings);
        assert_eq!(settings.sessdata, "saved");
        assert_eq!(settings.defaults.pages, 3);
        assert!(settings.cache);
    }

    #[test]
    fn test_flags_override_settings() {
        let mut settings = Settings::default();
        settings.sessdata = "saved".to_string();
        let flags = FetchArgs {
            sessdata: Some(" fresh ".to_string()),
            feed_type: Some(FeedType::Video),
            pages: Some(2),
            no_cache: true,
            target_up_mids: Some("3; 1".to_string()),
            keyword: Some("live".to_string()),
            view: Some(ViewMode::Detail),
            ..args()
        };

        flags.apply(&mut settings);
        assert_eq!(settings.sessdata, "fresh");
        assert_eq!(settings.defaults.feed_type, FeedType::Video);
        assert_eq!(settings.defaults.pages, 2);
        assert!(!settings.cache);
        assert_eq!(settings.defaults.target_up_mids, "3,1");
        assert_eq!(settings.defaults.keyword, "live");
        assert_eq!(settings.defaults.view, ViewMode::Detail);
    }

    #[test]
    fn test_unusable_numbers_are_ignored() {
        let mut settings = Settings::default();
        let flags = FetchArgs {
            pages: Some(0),
            timeout: Some(0),
            cache_ttl: Some(-5),
            request_interval: Some(-1.0),
            request_retry_factor: Some(0.5),
            ..args()
        };

        flags.apply(&mut settings);
        assert_eq!(settings.defaults.pages, 5);
        assert_eq!(settings.defaults.timeout_seconds, 10);
        assert_eq!(settings.cache_ttl_minutes, 60);
        assert!(settings.fetch.request_interval_seconds.abs() < f64::EPSILON);
        assert!((settings.fetch.retry_backoff_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_credentials_include_flag_only_cookies() {
        let mut settings = Settings::default();
        let flags = FetchArgs {
            sessdata: Some("s".to_string()),
            dedeuserid: Some("42".to_string()),
            ..args()
        };
        flags.apply(&mut settings);

        let credentials = flags.credentials(&settings);
        assert_eq!(credentials.sessdata, "s");
        assert_eq!(credentials.dedeuserid, "42");
        assert!(!credentials.is_empty());
    }

    #[test]
    fn test_time_window() {
        let mut settings = Settings::default();
        settings.defaults.time_from = "2024-01-01".to_string();
        settings.defaults.time_to = "2024-01-01".to_string();

        let options = FetchArgs::fetch_options(&settings, &Localizer::default()).unwrap();
        assert!(options.start_ts > 0);
        assert_eq!(options.end_ts - options.start_ts, 86_399);
    }

    #[test]
    fn test_bad_time_is_localized() {
        let mut settings = Settings::default();
        settings.defaults.time_from = "yesterday".to_string();

        let err = FetchArgs::fetch_options(&settings, &Localizer::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid time 'yesterday', expected YYYY-MM-DD[ HH:MM[:SS]]."
        );
    }

    #[test]
    fn test_summary_flags() {
        let mut summary = SummarySettings::default();
        let flags = SummaryFlags {
            summary_provider: Some("openai".to_string()),
            summary_api_key: Some(" sk-1 ".to_string()),
            summary_no_json_format: true,
            summary_extra_headers: Some(r#"{"X-Org": "a", "X-Retry": 2}"#.to_string()),
            summary_max_items: Some(0),
            summary_timeout: Some(2),
            ..Default::default()
        };

        flags.apply(&mut summary);
        assert_eq!(summary.provider, "openai");
        assert_eq!(summary.api_key, "sk-1");
        assert!(!summary.use_json_format);
        assert_eq!(summary.extra_headers.get("X-Org").map(String::as_str), Some("a"));
        assert_eq!(summary.extra_headers.get("X-Retry").map(String::as_str), Some("2"));
        assert_eq!(summary.max_items, 80);
        assert_eq!(summary.timeout_seconds, 5);

        let options = summary_options(&summary);
        assert_eq!(options.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_headers_are_ignored() {
        let mut summary = SummarySettings::default();
        summary.extra_headers.insert("Keep".to_string(), "1".to_string());
        let flags = SummaryFlags {
            summary_extra_headers: Some("[1, 2]".to_string()),
            ..Default::default()
        };

        flags.apply(&mut summary);
        assert_eq!(summary.extra_headers.len(), 1);
    }
}
