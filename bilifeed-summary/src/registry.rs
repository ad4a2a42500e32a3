//! Provider registry.
//!
//! Maps a configured provider name to a [`ProviderKind`] and builds the
//! matching [`SummaryProvider`]. This is the only place provider names are
//! interpreted.

use std::fmt;

use tracing::debug;

use crate::error::ProviderError;
use crate::gemini::GeminiProvider;
use crate::openai::{ApiMode, OpenAiConfig, OpenAiProvider};
use crate::pipeline::SummaryOptions;
use crate::provider::SummaryProvider;

// ============================================================================
// Provider Kind
// ============================================================================

/// Summary backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Extractive summary, no network.
    Local,
    /// Hosted OpenAI API.
    OpenAi,
    /// Any OpenAI-compatible endpoint behind a base URL.
    CustomOpenAi,
    /// Google Gemini.
    Gemini,
}

impl ProviderKind {
    /// Every kind, in display order.
    pub fn all() -> &'static [ProviderKind] {
        &[Self::Local, Self::OpenAi, Self::CustomOpenAi, Self::Gemini]
    }

    /// Configured name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::OpenAi => "openai",
            Self::CustomOpenAi => "custom_openai",
            Self::Gemini => "gemini",
        }
    }

    /// Parses a configured name. Empty and `none` mean local.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "none" => Some(Self::Local),
            other => Self::all().iter().copied().find(|k| k.as_str() == other),
        }
    }

    /// Returns true if the backend calls a remote API.
    pub fn is_remote(&self) -> bool {
        *self != Self::Local
    }

    /// Returns true if a base URL must be configured.
    pub fn requires_base_url(&self) -> bool {
        *self == Self::CustomOpenAi
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Builds providers from summary options.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Builds the remote provider for `kind`, or `None` for [`ProviderKind::Local`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingApiKey`] when a remote provider has no
    /// key, [`ProviderError::MissingBaseUrl`] when the custom endpoint has no
    /// base URL, or an error if the HTTP client cannot be built.
    pub fn build(
        kind: ProviderKind,
        options: &SummaryOptions,
    ) -> Result<Option<Box<dyn SummaryProvider>>, ProviderError> {
        if !kind.is_remote() {
            return Ok(None);
        }
        if options.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        if kind.requires_base_url() && options.base_url.trim().is_empty() {
            return Err(ProviderError::MissingBaseUrl);
        }

        debug!(provider = %kind, "Building summary provider");
        let provider: Box<dyn SummaryProvider> = match kind {
            ProviderKind::OpenAi | ProviderKind::CustomOpenAi => Box::new(OpenAiProvider::new(
                kind.as_str(),
                OpenAiConfig {
                    api_key: options.api_key.trim().to_string(),
                    model: options.model.clone(),
                    base_url: options.base_url.clone(),
                    api_mode: ApiMode::parse(&options.api_mode),
                    use_json_format: options.use_json_format,
                    extra_headers: options.extra_headers.clone(),
                },
                options.timeout,
            )?),
            ProviderKind::Gemini => Box::new(GeminiProvider::new(
                options.api_key.trim(),
                &options.model,
                options.timeout,
            )?),
            ProviderKind::Local => return Ok(None),
        };
        Ok(Some(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(ProviderKind::parse(""), Some(ProviderKind::Local));
        assert_eq!(ProviderKind::parse(" None "), Some(ProviderKind::Local));
        assert_eq!(ProviderKind::parse("LOCAL"), Some(ProviderKind::Local));
        assert_eq!(ProviderKind::parse("openai"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::parse("custom_openai"), Some(ProviderKind::CustomOpenAi));
        assert_eq!(ProviderKind::parse("Gemini"), Some(ProviderKind::Gemini));
        assert_eq!(ProviderKind::parse("claude"), None);
    }

    #[test]
    fn test_roundtrip_names() {
        for kind in ProviderKind::all() {
            assert_eq!(ProviderKind::parse(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_local_builds_nothing() {
        let built = ProviderRegistry::build(ProviderKind::Local, &SummaryOptions::default());
        assert!(built.unwrap().is_none());
    }

    #[test]
    fn test_missing_key() {
        let options = SummaryOptions {
            api_key: "  ".to_string(),
            ..Default::default()
        };
        let built = ProviderRegistry::build(ProviderKind::Gemini, &options);
        assert!(matches!(built, Err(ProviderError::MissingApiKey)));
    }

    #[test]
    fn test_key_checked_before_base_url() {
        let built = ProviderRegistry::build(ProviderKind::CustomOpenAi, &SummaryOptions::default());
        assert!(matches!(built, Err(ProviderError::MissingApiKey)));

        let options = SummaryOptions {
            api_key: "k".to_string(),
            ..Default::default()
        };
        let built = ProviderRegistry::build(ProviderKind::CustomOpenAi, &options);
        assert!(matches!(built, Err(ProviderError::MissingBaseUrl)));
    }

    #[test]
    fn test_builds_named_providers() {
        let options = SummaryOptions {
            api_key: "k".to_string(),
            base_url: "https://llm.local/v1".to_string(),
            ..Default::default()
        };
        for kind in [ProviderKind::OpenAi, ProviderKind::CustomOpenAi, ProviderKind::Gemini] {
            let provider = ProviderRegistry::build(kind, &options).unwrap().unwrap();
            assert_eq!(provider.name(), kind.as_str());
        }
    }
}
