//! AI provider adapters.
//!
//! - `AnthropicProvider` / `OpenAIProvider` - vendor HTTP APIs
//! - `FailoverAIProvider` - primary with transient-error fallback
//! - `MockAIProvider` - scripted responses for tests and local runs

mod anthropic_provider;
mod failover_provider;
mod mock_provider;
mod openai_provider;
mod transport;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use failover_provider::FailoverAIProvider;
pub use mock_provider::{MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_CONTENT};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
