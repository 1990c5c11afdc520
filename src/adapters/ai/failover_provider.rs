//! Failover AI Provider - Wrapper that provides automatic failover between providers.
//!
//! When the primary provider fails with a transient error (rate limit, unavailable,
//! network, timeout), the request is retried once against the secondary provider
//! if one is configured.
//!
//! # Example
//!
//! ```ignore
//! let provider = FailoverAIProvider::new(Arc::new(anthropic))
//!     .with_fallback(Arc::new(openai));
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover support.
pub struct FailoverAIProvider {
    primary: Arc<dyn AIProvider>,
    fallback: Option<Arc<dyn AIProvider>>,
}

impl FailoverAIProvider {
    /// Creates a new failover provider with only a primary provider.
    pub fn new(primary: Arc<dyn AIProvider>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback(mut self, fallback: Arc<dyn AIProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn log_usage(&self, request: &CompletionRequest, response: &CompletionResponse, provider: &str) {
        tracing::debug!(
            provider,
            model = %response.model,
            purpose = %request.metadata.purpose,
            trace_id = %request.metadata.trace_id,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "AI completion finished"
        );
    }
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let primary_info = self.primary.provider_info();

        match self.primary.complete(request.clone()).await {
            Ok(response) => {
                self.log_usage(&request, &response, &primary_info.name);
                Ok(response)
            }
            Err(err) if err.is_retryable() => {
                let Some(fallback) = self.fallback.as_ref() else {
                    return Err(err);
                };
                let fallback_info = fallback.provider_info();
                tracing::warn!(
                    primary = %primary_info.name,
                    fallback = %fallback_info.name,
                    trace_id = %request.metadata.trace_id,
                    error = %err,
                    "AI provider failover"
                );
                let response = fallback.complete(request.clone()).await?;
                self.log_usage(&request, &response, &fallback_info.name);
                Ok(response)
            }
            Err(err) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.primary.provider_info()
    }
}
