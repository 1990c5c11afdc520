//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, either in call order or per prompt purpose
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response_for(PromptPurpose::ClassifyField, "wifi")
//!     .with_response_for(PromptPurpose::FriendlyRewrite, "The WiFi is CasaAzul!");
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, PromptPurpose,
    ProviderInfo, TokenUsage,
};

/// Content returned once every configured response has been consumed.
pub const DEFAULT_MOCK_CONTENT: &str = "Mock response";

/// Mock AI provider for testing.
///
/// Purpose-scoped responses take precedence over the shared queue, so a test
/// can script one pipeline step without counting calls made by the others.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Responses consumed in call order.
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Responses consumed only by requests with a matching purpose.
    scoped: Arc<Mutex<HashMap<PromptPurpose, VecDeque<MockResponse>>>>,
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success {
        content: String,
        usage: TokenUsage,
        finish_reason: FinishReason,
    },
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            scoped: Arc::new(Mutex::new(HashMap::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the shared queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(success(content.into()));
        self
    }

    /// Adds an error response to the shared queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(MockResponse::Error(error));
        self
    }

    /// Adds a successful response for one prompt purpose.
    pub fn with_response_for(self, purpose: PromptPurpose, content: impl Into<String>) -> Self {
        self.push_scoped(purpose, success(content.into()));
        self
    }

    /// Adds an error response for one prompt purpose.
    pub fn with_error_for(self, purpose: PromptPurpose, error: MockError) -> Self {
        self.push_scoped(purpose, MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns the number of calls made for one purpose.
    pub fn calls_for(&self, purpose: PromptPurpose) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|call| call.metadata.purpose == purpose)
            .count()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push_scoped(&self, purpose: PromptPurpose, response: MockResponse) {
        self.scoped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(purpose)
            .or_default()
            .push_back(response);
    }

    /// Gets the next response for a purpose, then the shared queue, then a default.
    fn next_response(&self, purpose: PromptPurpose) -> MockResponse {
        if let Some(response) = self
            .scoped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&purpose)
            .and_then(VecDeque::pop_front)
        {
            return response;
        }
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| success(DEFAULT_MOCK_CONTENT.to_string()))
    }
}

fn success(content: String) -> MockResponse {
    MockResponse::Success {
        content,
        usage: TokenUsage::new(10, 20),
        finish_reason: FinishReason::Stop,
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let purpose = request.metadata.purpose;
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response(purpose) {
            MockResponse::Success {
                content,
                usage,
                finish_reason,
            } => Ok(CompletionResponse {
                content,
                usage,
                model: self.info.model.clone(),
                finish_reason,
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ChatRole, RequestMetadata};

    fn request(purpose: PromptPurpose) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(purpose, "trace-123"))
            .with_message(ChatRole::User, "Hello")
    }

    #[tokio::test]
    async fn mock_provider_returns_responses_in_order() {
        let provider = MockAIProvider::new().with_response("First").with_response("Second");

        let r1 = provider.complete(request(PromptPurpose::MatchFaq)).await.unwrap();
        let r2 = provider.complete(request(PromptPurpose::MatchFaq)).await.unwrap();

        assert_eq!(r1.content, "First");
        assert_eq!(r2.content, "Second");
        assert_eq!(r1.model, "mock-model-1");
    }

    #[tokio::test]
    async fn mock_provider_returns_default_after_exhausted() {
        let provider = MockAIProvider::new().with_response("Only one");

        provider.complete(request(PromptPurpose::MatchFaq)).await.unwrap();
        let r2 = provider.complete(request(PromptPurpose::MatchFaq)).await.unwrap();

        assert_eq!(r2.content, DEFAULT_MOCK_CONTENT);
    }

    #[tokio::test]
    async fn scoped_responses_take_precedence() {
        let provider = MockAIProvider::new()
            .with_response("shared")
            .with_response_for(PromptPurpose::ClassifyField, "wifi");

        let rewrite = provider
            .complete(request(PromptPurpose::FriendlyRewrite))
            .await
            .unwrap();
        let classify = provider
            .complete(request(PromptPurpose::ClassifyField))
            .await
            .unwrap();

        assert_eq!(rewrite.content, "shared");
        assert_eq!(classify.content, "wifi");
    }

    #[tokio::test]
    async fn mock_provider_returns_configured_error() {
        let provider = MockAIProvider::new().with_error_for(
            PromptPurpose::GenerativeFallback,
            MockError::RateLimited { retry_after_secs: 30 },
        );

        let err = provider
            .complete(request(PromptPurpose::GenerativeFallback))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn mock_provider_tracks_calls_by_purpose() {
        let provider = MockAIProvider::new();

        provider.complete(request(PromptPurpose::ClassifyField)).await.unwrap();
        provider.complete(request(PromptPurpose::MatchFaq)).await.unwrap();
        provider.complete(request(PromptPurpose::MatchFaq)).await.unwrap();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.calls_for(PromptPurpose::MatchFaq), 2);

        provider.clear_calls();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn mock_provider_simulates_delay() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(20));
        let start = std::time::Instant::now();

        provider.complete(request(PromptPurpose::MatchFaq)).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
