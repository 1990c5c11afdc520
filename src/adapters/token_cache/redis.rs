//! Redis-backed token cache. Redis enforces the TTL.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::ports::{CacheError, TokenCache};

#[derive(Clone)]
pub struct RedisTokenCache {
    conn: MultiplexedConnection,
    prefix: String,
}

impl RedisTokenCache {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            prefix: "guest-concierge:".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

/// Redis rejects `EX 0`, so sub-second TTLs round up to one second.
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get(self.key(key))
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(self.key(key))
            .arg(value)
            .arg("EX")
            .arg(expiry_secs(ttl))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.key(key))
            .await
            .map_err(|e: redis::RedisError| CacheError::Operation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_never_rounds_to_zero() {
        assert_eq!(expiry_secs(Duration::from_millis(200)), 1);
        assert_eq!(expiry_secs(Duration::from_secs(3600)), 3600);
    }
}
