//! Feed page sources.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::response::{FeedResponse, PageRequest};

/// Something that can fetch one feed page.
///
/// The HTTP implementation is [`crate::client::FeedClient`]; tests plug in
/// scripted sources.
///
/// # Example
///
/// ```ignore
/// struct Canned(FeedResponse);
///
/// #[async_trait]
/// impl FeedSource for Canned {
///     async fn fetch_page(&self, _req: &PageRequest) -> Result<FeedResponse, FetchError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches one page.
    ///
    /// Transport failures are errors; API-level failures come back as a
    /// response with a non-zero `code`.
    async fn fetch_page(&self, request: &PageRequest) -> Result<FeedResponse, FetchError>;
}
