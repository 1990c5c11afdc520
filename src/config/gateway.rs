//! Messaging gateway configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upstream messaging platform credentials and limits.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// API root, e.g. `https://api.example.com/v1`
    pub base_url: String,

    pub client_id: String,

    pub client_secret: Secret<String>,

    /// Per-send deadline in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Token lifetime assumed when the token response omits `expires_in`
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidGatewayUrl);
        }
        if self.client_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__CLIENT_ID"));
        }
        if self.client_secret().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__CLIENT_SECRET"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("gateway.timeout_secs"));
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_token_ttl() -> u64 {
    3600
}
