//! Pagination engine.
//!
//! Walks the feed page by page, normalizes every item, keeps the selected
//! authors, and decides when to stop:
//!
//! 1. the endpoint reports a failure after retries (partial results kept)
//! 2. the endpoint reports no more pages
//! 3. a window start is set and the page's oldest post predates it
//! 4. the operator declines the next page in interactive mode
//! 5. the page budget is used up
//!
//! A non-empty cache entry for the same query replaces the whole walk. The
//! time window and keyword filters run afterwards on either source.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use bilifeed_core::{PostRecord, apply_filters, normalize_item};
use bilifeed_store::{CacheStore, compute_fingerprint};

use crate::client::FeedClient;
use crate::context::FetchOptions;
use crate::credentials::Credentials;
use crate::error::FetchError;
use crate::retry::{Sleeper, TokioSleeper, fetch_page_with_retry};
use crate::source::FeedSource;

// ============================================================================
// Observer
// ============================================================================

/// Progress of one fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageProgress {
    /// 1-based page number.
    pub page: u32,
    /// Page budget.
    pub pages: u32,
    /// Items on the page before author filtering.
    pub items: usize,
    /// Items kept after author filtering.
    pub kept: usize,
    /// Whether the endpoint reported another page.
    pub has_more: bool,
    /// Estimated seconds for the remaining pages.
    pub eta_secs: u64,
}

/// Receives progress reports and answers the interactive page prompt.
///
/// Every method has a no-op default, so implementors only override what
/// they display.
#[async_trait]
pub trait PageObserver: Send + Sync {
    /// Posts were served from the cache.
    fn on_cache_hit(&self, _count: usize) {}

    /// A page was fetched and processed.
    fn on_page(&self, _progress: &PageProgress) {}

    /// A page failed after all retries; pagination stops.
    fn on_failure(&self, _code: i64, _message: &str) {}

    /// Nothing survived the filters.
    fn on_empty(&self) {}

    /// Asks whether to fetch page `next_page`. `false` stops pagination.
    async fn confirm_continue(&self, _next_page: u32) -> bool {
        true
    }
}

/// Observer that reports nothing and always continues.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl PageObserver for SilentObserver {}

// ============================================================================
// Pager
// ============================================================================

/// Drives a [`FeedSource`] across pages.
pub struct Pager {
    source: Arc<dyn FeedSource>,
    cache: Option<CacheStore>,
    sleeper: Arc<dyn Sleeper>,
}

impl Pager {
    /// Creates a pager over `source` with no cache and real sleeps.
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source,
            cache: None,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Uses `cache` when the options enable caching.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the sleeper used for backoff and page intervals.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Fetches, caches and filters posts.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NoCredentials`] if `credentials` carry no
    /// cookie at all. Page failures stop pagination but are not errors.
    #[instrument(skip_all, fields(pages = options.pages, mode = %options.query_mode))]
    pub async fn run(
        &self,
        options: &FetchOptions,
        credentials: &Credentials,
        observer: &dyn PageObserver,
    ) -> Result<Vec<PostRecord>, FetchError> {
        if credentials.is_empty() {
            return Err(FetchError::NoCredentials);
        }

        let fingerprint = compute_fingerprint(&options.query_shape(credentials));
        let cache = self.cache.as_ref().filter(|_| options.use_cache);

        let mut collected = match cache {
            Some(cache) => cache.load(&fingerprint, options.cache_ttl_minutes).await,
            None => Vec::new(),
        };

        if collected.is_empty() {
            collected = self.walk(options, observer).await;
            if let Some(cache) = cache {
                if !collected.is_empty() {
                    if let Err(e) = cache.save(&fingerprint, &collected).await {
                        warn!(error = %e, "Failed to write cache");
                    }
                }
            }
        } else {
            observer.on_cache_hit(collected.len());
        }

        let filtered = apply_filters(collected, options.start_ts, options.end_ts, &options.keyword);
        if filtered.is_empty() {
            observer.on_empty();
        }
        info!(posts = filtered.len(), "Fetch complete");
        Ok(filtered)
    }

    /// The network loop. Returns author-filtered posts in fetch order.
    async fn walk(&self, options: &FetchOptions, observer: &dyn PageObserver) -> Vec<PostRecord> {
        let targets = options.query_shape(&Credentials::default());
        let selected = targets.filters_authors().then(|| targets.target_set());

        let mut offset = String::new();
        let mut baseline = String::new();
        let mut collected = Vec::new();
        let mut durations: Vec<f64> = Vec::new();

        for page in 1..=options.pages {
            let started = Instant::now();
            let request = options.page_request(&offset, &baseline);
            let response = fetch_page_with_retry(
                self.source.as_ref(),
                &request,
                &options.retry,
                self.sleeper.as_ref(),
            )
            .await;
            durations.push(started.elapsed().as_secs_f64());

            if !response.is_success() {
                warn!(page, code = response.code, "Page failed, stopping");
                observer.on_failure(response.code, response.error_message());
                break;
            }

            let data = response.data.unwrap_or_default();
            offset = data.offset;
            if !data.update_baseline.is_empty() {
                baseline = data.update_baseline;
            }

            let mut oldest = 0_i64;
            let mut kept = 0;
            for item in &data.items {
                let post = normalize_item(item);
                if post.published_at != 0 {
                    oldest = if oldest == 0 {
                        post.published_at
                    } else {
                        oldest.min(post.published_at)
                    };
                }
                if let Some(targets) = &selected {
                    if !targets.contains(&post.author_id) {
                        continue;
                    }
                }
                collected.push(post);
                kept += 1;
            }

            let progress = PageProgress {
                page,
                pages: options.pages,
                items: data.items.len(),
                kept,
                has_more: data.has_more,
                eta_secs: eta_secs(&durations, options.pages - page),
            };
            debug!(page, items = progress.items, kept, oldest, "Page processed");
            observer.on_page(&progress);

            if !data.has_more {
                break;
            }

            if options.start_ts != 0 && oldest != 0 && oldest < options.start_ts {
                debug!(page, oldest, start_ts = options.start_ts, "Page predates window, stopping");
                break;
            }

            if options.interactive
                && page < options.pages
                && !observer.confirm_continue(page + 1).await
            {
                debug!(page, "Stopped by operator");
                break;
            }

            if page < options.pages && options.request_interval_secs > 0.0 {
                self.sleeper.sleep(options.request_interval_secs).await;
            }
        }

        collected
    }
}

/// Average page time multiplied by the pages left, in whole seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn eta_secs(durations: &[f64], remaining: u32) -> u64 {
    if durations.is_empty() {
        return 0;
    }
    let avg = durations.iter().sum::<f64>() / durations.len() as f64;
    (avg * f64::from(remaining)).max(0.0) as u64
}

// ============================================================================
// Entry Point
// ============================================================================

/// Fetches dynamics over HTTP.
///
/// Builds a [`FeedClient`] for `credentials`, then runs a [`Pager`] with the
/// given cache.
///
/// # Errors
///
/// Returns [`FetchError::NoCredentials`] when no cookie is supplied, or an
/// error if the endpoint or a cookie value is unusable.
pub async fn fetch_dynamics(
    credentials: &Credentials,
    options: &FetchOptions,
    cache: Option<CacheStore>,
    observer: &dyn PageObserver,
) -> Result<Vec<PostRecord>, FetchError> {
    let client = FeedClient::new(&options.endpoint, credentials, options.timeout)?;
    let mut pager = Pager::new(Arc::new(client));
    if let Some(cache) = cache {
        pager = pager.with_cache(cache);
    }
    pager.run(options, credentials, observer).await
}
