//! Token cache adapters.
//!
//! - `InMemoryTokenCache` - single-process deployments and tests
//! - `RedisTokenCache` - shared across instances, expiry via `SET ... EX`

mod in_memory;
mod redis;

pub use self::in_memory::InMemoryTokenCache;
pub use self::redis::RedisTokenCache;
