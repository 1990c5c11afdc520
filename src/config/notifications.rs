//! Support-team notification configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Slack incoming-webhook settings. Tickets are still stored without it.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    pub slack_webhook_url: Secret<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl NotificationsConfig {
    pub fn webhook_url(&self) -> &str {
        self.slack_webhook_url.expose_secret()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.webhook_url().starts_with("https://") {
            return Err(ValidationError::InvalidWebhookUrl);
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_must_be_https() {
        let config = NotificationsConfig {
            slack_webhook_url: Secret::new("http://hooks.slack.com/services/x".into()),
            timeout_secs: 10,
        };
        assert!(config.validate().is_err());

        let config = NotificationsConfig {
            slack_webhook_url: Secret::new("https://hooks.slack.com/services/x".into()),
            ..config
        };
        assert!(config.validate().is_ok());
    }
}
