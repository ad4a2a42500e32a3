//! Summary provider trait and shared HTTP plumbing.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;

/// A remote model that turns a prompt into raw text.
///
/// Implementations only transport; JSON extraction and grounding happen in
/// the pipeline, so a provider that returns prose is not an error here.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Name recorded on a successful report.
    fn name(&self) -> &'static str;

    /// Sends `prompt` and returns the model's text answer.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// HTTP client bounded by `timeout`.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Request(e.to_string()))
}

/// Sends `request` and decodes a JSON body.
///
/// A non-success status becomes [`ProviderError::Http`] carrying the body,
/// re-serialized when it is JSON and verbatim otherwise.
pub(crate) async fn send_json(request: RequestBuilder) -> Result<Value, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(status = %status, "Provider responded");

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(value) => value.to_string(),
            Err(_) => text,
        };
        return Err(ProviderError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}
