//! OpenAI-compatible provider.
//!
//! Serves both the hosted OpenAI API (`openai`) and any compatible endpoint
//! behind a custom base URL (`custom_openai`). Two request shapes are
//! supported:
//!
//! - `chat_completions`: system + user message pair, optional
//!   `response_format: json_object`
//! - `responses`: a single `input` string
//!
//! Caller-supplied extra headers are merged over the bearer and content-type
//! headers, so they can replace either.

pub mod api;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::ProviderError;
use crate::provider::{SummaryProvider, http_client, send_json};
pub use api::ApiMode;

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Clone, Default)]
pub struct OpenAiConfig {
    /// Bearer token.
    pub api_key: String,
    /// Model, empty for [`api::DEFAULT_MODEL`].
    pub model: String,
    /// Base URL, empty for the hosted API.
    pub base_url: String,
    /// Request shape.
    pub api_mode: ApiMode,
    /// Ask chat completions for a JSON object.
    pub use_json_format: bool,
    /// Headers merged over the defaults.
    pub extra_headers: BTreeMap<String, String>,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &bilifeed_core::mask(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_mode", &self.api_mode)
            .field("use_json_format", &self.use_json_format)
            .field("extra_headers", &self.extra_headers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// OpenAI-compatible summary provider.
#[derive(Debug)]
pub struct OpenAiProvider {
    name: &'static str,
    config: OpenAiConfig,
    http: Client,
}

impl OpenAiProvider {
    /// Creates a provider reported under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        name: &'static str,
        config: OpenAiConfig,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            name,
            config,
            http: http_client(timeout)?,
        })
    }

    /// Resolved request URL.
    pub fn url(&self) -> String {
        api::api_url(&self.config.base_url, self.config.api_mode)
    }

    /// Resolved model name.
    pub fn model(&self) -> &str {
        if self.config.model.trim().is_empty() {
            api::DEFAULT_MODEL
        } else {
            self.config.model.trim()
        }
    }

    /// Bearer and content-type headers with the extra headers on top.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidHeader`] for a header that cannot be
    /// sent.
    pub fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|_| ProviderError::InvalidHeader("Authorization".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (key, value) in &self.config.extra_headers {
            if key.trim().is_empty() {
                continue;
            }
            let name = HeaderName::from_bytes(key.trim().as_bytes())
                .map_err(|_| ProviderError::InvalidHeader(key.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| ProviderError::InvalidHeader(key.clone()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl SummaryProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    #[instrument(skip(self, prompt), fields(provider = self.name, mode = ?self.config.api_mode))]
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = self.url();
        let body = api::request_body(
            self.model(),
            prompt,
            self.config.api_mode,
            self.config.use_json_format,
        );
        debug!(url = %url, model = self.model(), "Requesting summary");

        let data = send_json(self.http.post(&url).headers(self.headers()?).json(&body)).await?;

        Ok(match self.config.api_mode {
            ApiMode::Responses => api::extract_responses_text(&data),
            ApiMode::ChatCompletions => api::extract_chat_text(&data),
        })
    }
}
