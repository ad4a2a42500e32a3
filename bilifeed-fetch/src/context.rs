//! Fetch options.
//!
//! Everything one `fetch_dynamics` run needs besides the credentials: the
//! query shape, the post-fetch filters, caching and request pacing.

use std::time::Duration;

use bilifeed_core::{FeedType, QueryMode, QueryShape, normalize_mid_list};
use bilifeed_store::{DEFAULT_ENDPOINT, DEFAULT_FEATURES, DEFAULT_WEB_LOCATION, Settings};

use crate::credentials::Credentials;
use crate::response::PageRequest;
use crate::retry::RetryPolicy;

/// Options for one fetch run.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// Feed category.
    pub feed_type: FeedType,
    /// All authors or a selected set.
    pub query_mode: QueryMode,
    /// Target author ids for `selected_up`.
    pub target_up_mids: String,
    /// Maximum pages to walk.
    pub pages: u32,
    /// Ask before every further page.
    pub interactive: bool,
    /// Feed endpoint URL.
    pub endpoint: String,
    /// Feature-flag string.
    pub features: String,
    /// Location tag.
    pub web_location: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Window start in epoch seconds, `0` for unbounded.
    pub start_ts: i64,
    /// Window end in epoch seconds, `0` for unbounded.
    pub end_ts: i64,
    /// Keyword filter, all terms must match.
    pub keyword: String,
    /// Read and write the cache.
    pub use_cache: bool,
    /// Cache lifetime in minutes.
    pub cache_ttl_minutes: i64,
    /// Pause between pages in seconds.
    pub request_interval_secs: f64,
    /// Per-page retry policy.
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            feed_type: FeedType::All,
            query_mode: QueryMode::All,
            target_up_mids: String::new(),
            pages: 5,
            interactive: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            features: DEFAULT_FEATURES.to_string(),
            web_location: DEFAULT_WEB_LOCATION.to_string(),
            timeout: Duration::from_secs(10),
            start_ts: 0,
            end_ts: 0,
            keyword: String::new(),
            use_cache: true,
            cache_ttl_minutes: 60,
            request_interval_secs: 0.0,
            retry: RetryPolicy::default(),
        }
    }
}

impl FetchOptions {
    /// Builds options from clamped settings. The time window is left open;
    /// callers parse it separately because the input can be invalid.
    pub fn from_settings(settings: &Settings) -> Self {
        let d = &settings.defaults;
        let f = &settings.fetch;
        Self {
            feed_type: d.feed_type,
            query_mode: d.query_mode,
            target_up_mids: normalize_mid_list(&d.target_up_mids),
            pages: d.pages.max(1),
            interactive: d.interactive,
            endpoint: d.endpoint.clone(),
            features: d.features.clone(),
            web_location: d.web_location.clone(),
            timeout: Duration::from_secs(d.timeout_seconds.max(1)),
            start_ts: 0,
            end_ts: 0,
            keyword: d.keyword.clone(),
            use_cache: settings.cache,
            cache_ttl_minutes: settings.cache_ttl_minutes,
            request_interval_secs: f.request_interval_seconds,
            retry: RetryPolicy::new(
                f.max_retries,
                f.retry_backoff_seconds,
                f.retry_backoff_factor,
            ),
        }
    }

    /// The cache-relevant shape of this run.
    pub fn query_shape(&self, credentials: &Credentials) -> QueryShape {
        let (sessdata, cookie) = credentials.fingerprint_material();
        QueryShape {
            feed_type: self.feed_type,
            query_mode: self.query_mode,
            target_up_mids: self.target_up_mids.clone(),
            pages: self.pages,
            endpoint: self.endpoint.clone(),
            features: self.features.clone(),
            web_location: self.web_location.clone(),
            sessdata,
            cookie,
        }
    }

    /// The request for the page at the given cursors.
    pub fn page_request(&self, offset: &str, update_baseline: &str) -> PageRequest {
        PageRequest {
            feed_type: self.feed_type.as_str().to_string(),
            offset: offset.to_string(),
            update_baseline: update_baseline.to_string(),
            features: self.features.clone(),
            web_location: self.web_location.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.defaults.target_up_mids = "3;1 3".to_string();
        settings.defaults.pages = 0;
        settings.fetch.max_retries = 4;

        let options = FetchOptions::from_settings(&settings);
        assert_eq!(options.target_up_mids, "3,1");
        assert_eq!(options.pages, 1);
        assert_eq!(options.retry.max_attempts(), 5);
        assert_eq!(options.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_query_shape_carries_auth() {
        let options = FetchOptions::default();
        let shape = options.query_shape(&Credentials::new("a=1", "sess"));
        assert_eq!(shape.sessdata, "sess");
        assert_eq!(shape.pages, 5);
        assert_eq!(shape.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_page_request() {
        let options = FetchOptions {
            feed_type: FeedType::Video,
            ..Default::default()
        };
        let request = options.page_request("10", "20");
        assert_eq!(request.feed_type, "video");
        assert_eq!(request.offset, "10");
        assert_eq!(request.update_baseline, "20");
        assert_eq!(request.features, DEFAULT_FEATURES);
    }
}
