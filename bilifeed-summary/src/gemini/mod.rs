//! Gemini (Google) provider.
//!
//! Uses the Generative Language API with the key in the query string. The
//! key never appears in logs; request errors carrying the URL are redacted
//! before they reach the report.

pub mod api;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::ProviderError;
use crate::provider::{SummaryProvider, http_client, send_json};

/// Gemini summary provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    http: Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &bilifeed_core::mask(&self.api_key))
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Creates a provider; an empty `model` selects [`api::DEFAULT_MODEL`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let model = match model.trim() {
            "" => api::DEFAULT_MODEL,
            m => m,
        };
        Ok(Self {
            api_key: api_key.into(),
            model: model.to_string(),
            http: http_client(timeout)?,
        })
    }

    /// Resolved model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SummaryProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, prompt), fields(provider = "gemini", model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = api::generate_url(&self.model, &self.api_key)?;
        debug!("Requesting summary");

        let data = send_json(self.http.post(url).json(&api::request_body(prompt))).await?;
        Ok(api::extract_text(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let p = GeminiProvider::new("k", " ", Duration::from_secs(5)).unwrap();
        assert_eq!(p.model(), "gemini-1.5-flash");
        assert_eq!(p.name(), "gemini");
    }

    #[test]
    fn test_debug_masks_key() {
        let p = GeminiProvider::new("AIzaSySecretValue", "m", Duration::from_secs(5)).unwrap();
        assert!(!format!("{p:?}").contains("SecretValue"));
    }
}
