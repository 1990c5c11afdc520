//! Slack incoming-webhook notification channel.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::support::TicketPriority;
use crate::ports::{Notification, NotificationChannel, NotificationError};

#[derive(Debug, Clone)]
pub struct SlackConfig {
    webhook_url: Secret<String>,
    pub timeout: Duration,
}

impl SlackConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: Secret::new(webhook_url.into()),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct SlackWebhookChannel {
    config: SlackConfig,
    client: Client,
}

impl SlackWebhookChannel {
    pub fn new(config: SlackConfig) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotificationError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }
}

#[derive(Debug, Serialize)]
struct SlackMessage {
    text: String,
}

fn priority_marker(priority: TicketPriority) -> &'static str {
    match priority {
        TicketPriority::High => ":rotating_light:",
        TicketPriority::Medium => ":warning:",
        TicketPriority::Low => ":information_source:",
    }
}

/// Renders a notification as Slack mrkdwn.
fn render(notification: &Notification) -> SlackMessage {
    let mut text = format!(
        "{} *{}*\n{}",
        priority_marker(notification.priority),
        notification.title,
        notification.text
    );
    for (label, value) in &notification.fields {
        text.push_str(&format!("\n• *{}:* {}", label, value));
    }
    SlackMessage { text }
}

#[async_trait]
impl NotificationChannel for SlackWebhookChannel {
    async fn send_notification(&self, notification: &Notification) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.config.webhook_url.expose_secret())
            .json(&render(notification))
            .send()
            .await
            .map_err(|e| NotificationError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
