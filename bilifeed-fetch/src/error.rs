//! Fetch error types.

use thiserror::Error;

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Neither a cookie string nor any individual cookie was supplied.
    #[error("No cookies provided")]
    NoCredentials,

    /// A cookie or header value cannot be sent.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// The endpoint URL does not parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(err)
        }
    }
}
