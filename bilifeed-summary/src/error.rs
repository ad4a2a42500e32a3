//! Summary provider errors.

use bilifeed_core::SummaryErrorKind;
use thiserror::Error;

/// Errors raised while talking to a summary provider.
///
/// None of these escape the pipeline; each maps to a
/// [`SummaryErrorKind`] tag on the report.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider call exceeded its timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The provider answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, re-serialized JSON or raw text.
        body: String,
    },

    /// The request could not be built or sent.
    #[error("Request failed: {0}")]
    Request(String),

    /// A header value cannot be sent.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The provider answered with something that is not JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider needs an API key and none was configured.
    #[error("Missing API key in summary settings.")]
    MissingApiKey,

    /// The custom endpoint has no base URL.
    #[error("Missing base_url for custom_openai provider.")]
    MissingBaseUrl,

    /// The provider name is not recognized.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

impl ProviderError {
    /// Report tag for this error.
    pub fn kind(&self) -> SummaryErrorKind {
        match self {
            ProviderError::Timeout(_) => SummaryErrorKind::RequestTimeout,
            ProviderError::MissingApiKey => SummaryErrorKind::MissingApiKey,
            ProviderError::MissingBaseUrl => SummaryErrorKind::MissingBaseUrl,
            ProviderError::UnknownProvider(_) => SummaryErrorKind::UnknownProvider,
            ProviderError::Http { .. }
            | ProviderError::Request(_)
            | ProviderError::InvalidHeader(_)
            | ProviderError::InvalidResponse(_) => SummaryErrorKind::RequestFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ProviderError::Timeout("x".into()).kind(),
            SummaryErrorKind::RequestTimeout
        );
        assert_eq!(
            ProviderError::Http {
                status: 500,
                body: String::new()
            }
            .kind(),
            SummaryErrorKind::RequestFailed
        );
        assert_eq!(
            ProviderError::UnknownProvider("x".into()).kind(),
            SummaryErrorKind::UnknownProvider
        );
    }

    #[test]
    fn test_http_display() {
        let err = ProviderError::Http {
            status: 401,
            body: r#"{"error":"bad key"}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"HTTP 401: {"error":"bad key"}"#);
    }
}
