//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Generative-text providers (Anthropic, OpenAI, failover, mock)
//! - `faq` - FAQ corpus backed by a YAML document
//! - `gateway` - Upstream messaging platform over HTTP
//! - `http` - Inbound webhook and support-ticket API (axum)
//! - `memory` - In-memory stores for tests and local runs
//! - `notifications` - Support-team alerts (Slack webhook, recording)
//! - `postgres` - Conversation log, listings and tickets (sqlx)
//! - `token_cache` - Gateway credential cache (Redis, in-memory)

pub mod ai;
pub mod faq;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod notifications;
pub mod postgres;
pub mod token_cache;
