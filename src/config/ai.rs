//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Generative-text provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub openai_api_key: Option<Secret<String>>,

    pub anthropic_api_key: Option<Secret<String>>,

    /// Provider every prompt goes to first
    #[serde(default = "default_provider")]
    pub primary_provider: AiProvider,

    /// Provider tried when the primary fails with a retryable error
    pub fallback_provider: Option<AiProvider>,

    /// Model override for Anthropic
    pub anthropic_model: Option<String>,

    /// Model override for OpenAI
    pub openai_model: Option<String>,

    /// Per-call deadline in seconds, applied to every AI stage
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    #[default]
    Anthropic,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the API key of a provider when it is set and non-empty.
    pub fn api_key(&self, provider: AiProvider) -> Option<&str> {
        let key = match provider {
            AiProvider::OpenAI => self.openai_api_key.as_ref(),
            AiProvider::Anthropic => self.anthropic_api_key.as_ref(),
        };
        key.map(|k| k.expose_secret().as_str())
            .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key(AiProvider::OpenAI).is_none()
            && self.api_key(AiProvider::Anthropic).is_none()
        {
            return Err(ValidationError::NoAiProviderConfigured);
        }

        for provider in std::iter::once(self.primary_provider).chain(self.fallback_provider) {
            if self.api_key(provider).is_none() {
                return Err(ValidationError::MissingRequired(match provider {
                    AiProvider::OpenAI => "AI__OPENAI_API_KEY",
                    AiProvider::Anthropic => "AI__ANTHROPIC_API_KEY",
                }));
            }
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("ai.timeout_secs"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_provider(),
            fallback_provider: None,
            anthropic_model: None,
            openai_model: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::Anthropic
}

fn default_timeout() -> u64 {
    80
}

fn default_retries() -> u32 {
    2
}
