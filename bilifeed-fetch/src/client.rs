//! HTTP feed client.

use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::credentials::Credentials;
use crate::error::FetchError;
use crate::response::{FeedResponse, PageRequest};
use crate::source::FeedSource;

/// Browser user agent; the endpoint rejects obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// `Referer` sent with every request.
const REFERER: &str = "https://t.bilibili.com/";

/// `Origin` sent with every request.
const ORIGIN: &str = "https://www.bilibili.com";

/// Cookie-authenticated client for the feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedClient {
    inner: Client,
    endpoint: Url,
}

impl FeedClient {
    /// Creates a client for `endpoint` carrying `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NoCredentials`] if there are no cookies, an
    /// error if the endpoint or a cookie value is malformed, or if the TLS
    /// backend cannot be initialized.
    pub fn new(
        endpoint: &str,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let endpoint = Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let cookie = credentials.cookie_header()?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::REFERER, header::HeaderValue::from_static(REFERER));
        headers.insert(header::ORIGIN, header::HeaderValue::from_static(ORIGIN));
        let mut cookie_value = header::HeaderValue::from_str(&cookie)
            .map_err(|_| FetchError::InvalidHeader("Cookie".to_string()))?;
        cookie_value.set_sensitive(true);
        headers.insert(header::COOKIE, cookie_value);

        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { inner, endpoint })
    }

    /// The feed endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    #[instrument(skip(self, request), fields(offset = %request.offset))]
    async fn fetch_page(&self, request: &PageRequest) -> Result<FeedResponse, FetchError> {
        debug!(url = %self.endpoint, "GET feed page");

        let response = self
            .inner
            .get(self.endpoint.clone())
            .query(request)
            .send()
            .await?
            .error_for_status()?;

        debug!(status = %response.status(), "Response received");
        Ok(response.json::<FeedResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://api.bilibili.com/x/polymer/web-dynamic/v1/feed/all";

    #[test]
    fn test_requires_cookies() {
        let result = FeedClient::new(ENDPOINT, &Credentials::default(), Duration::from_secs(5));
        assert!(matches!(result, Err(FetchError::NoCredentials)));
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let creds = Credentials::new("", "s");
        let result = FeedClient::new("not a url", &creds, Duration::from_secs(5));
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_unsendable_cookie() {
        let creds = Credentials::new("", "line\nbreak");
        let result = FeedClient::new(ENDPOINT, &creds, Duration::from_secs(5));
        assert!(matches!(result, Err(FetchError::InvalidHeader(_))));
    }

    #[test]
    fn test_builds_client() {
        let creds = Credentials::new("", "s");
        let client = FeedClient::new(ENDPOINT, &creds, Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint().host_str(), Some("api.bilibili.com"));
    }
}
