//! Page retries with exponential backoff.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::response::{FeedResponse, PageRequest};
use crate::source::FeedSource;

// ============================================================================
// Sleeping
// ============================================================================

/// Waits between attempts and between pages.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Sleeps for `secs` seconds.
    async fn sleep(&self, secs: f64);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, secs: f64) {
        if secs > 0.0 && secs.is_finite() {
            tokio::time::sleep(Duration::from_secs_f64(secs)).await;
        }
    }
}

// ============================================================================
// Retry Policy
// ============================================================================

/// How often and how patiently a page request is retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Delay before the first retry, in seconds.
    pub backoff_secs: f64,
    /// Multiplier applied to the delay after every retry.
    pub factor: f64,
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(retries: u32, backoff_secs: f64, factor: f64) -> Self {
        Self {
            retries,
            backoff_secs,
            factor,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0, 0.0, 1.0)
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// First delay, never negative.
    pub fn initial_delay(&self) -> f64 {
        if self.backoff_secs.is_finite() {
            self.backoff_secs.max(0.0)
        } else {
            0.0
        }
    }

    /// Delay multiplier, never below 1 so the backoff never shrinks.
    pub fn growth(&self) -> f64 {
        if self.factor.is_finite() {
            self.factor.max(1.0)
        } else {
            1.0
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, 1.0, 2.0)
    }
}

// ============================================================================
// Retrying Fetch
// ============================================================================

/// Fetches one page, retrying transport errors and non-zero `code`s.
///
/// Never fails: after the last attempt the last API response is returned
/// as-is, and a transport error becomes a `code = -1` response.
pub async fn fetch_page_with_retry(
    source: &dyn FeedSource,
    request: &PageRequest,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
) -> FeedResponse {
    let max_attempts = policy.max_attempts();
    let factor = policy.growth();
    let mut delay = policy.initial_delay();

    for attempt in 1..=max_attempts {
        match source.fetch_page(request).await {
            Ok(response) if response.is_success() => {
                debug!(attempt, "Page fetched");
                return response;
            }
            Ok(response) => {
                if attempt >= max_attempts {
                    return response;
                }
                warn!(
                    attempt,
                    code = response.code,
                    message = response.error_message(),
                    delay_secs = delay,
                    "Feed returned an error, retrying"
                );
            }
            Err(e) => {
                if attempt >= max_attempts {
                    return FeedResponse::transport_failure(e.to_string());
                }
                warn!(attempt, error = %e, delay_secs = delay, "Request failed, retrying");
            }
        }

        if delay > 0.0 {
            sleeper.sleep(delay).await;
            delay *= factor;
        }
    }

    FeedResponse::transport_failure(String::new())
}
