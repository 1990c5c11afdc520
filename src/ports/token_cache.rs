//! Token cache port - TTL-keyed storage for short-lived credentials.
//!
//! Expiry is the cache's job: a value read after its TTL has elapsed is
//! reported as absent, with no cleanup timers on the caller's side.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Returns the cached value if it has not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Drops a value before its TTL elapses.
    async fn invalidate(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache operation failed: {0}")]
    Operation(String),
}
