//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `GUEST_CONCIERGE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use guest_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod database;
mod error;
mod gateway;
mod knowledge;
mod notifications;
mod pipeline;
mod redis;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use gateway::GatewayConfig;
pub use knowledge::KnowledgeConfig;
pub use notifications::NotificationsConfig;
pub use pipeline::PipelineConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    /// Token cache backend; in-memory when absent
    pub redis: Option<RedisConfig>,

    #[serde(default)]
    pub ai: AiConfig,

    pub gateway: GatewayConfig,

    /// Slack alerts; tickets are only stored when absent
    pub notifications: Option<NotificationsConfig>,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GUEST_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GUEST_CONCIERGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GUEST_CONCIERGE__PIPELINE__ESCALATION_THRESHOLD=0.75`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GUEST_CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.ai.validate()?;
        self.gateway.validate()?;
        if let Some(notifications) = &self.notifications {
            notifications.validate()?;
        }
        self.pipeline.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
