//! Notification channel port - alerts a human that a guest needs attention.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::support::TicketPriority;

/// Port for push notifications to the support team.
///
/// Delivery is best-effort from the caller's point of view; implementations
/// report failures but callers must not depend on delivery.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send_notification(&self, notification: &Notification)
        -> Result<(), NotificationError>;
}

/// Alert payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub text: String,
    pub priority: TicketPriority,
    /// Ordered label/value pairs rendered under the text.
    pub fields: Vec<(String, String)>,
}

impl Notification {
    pub fn new(title: impl Into<String>, text: impl Into<String>, priority: TicketPriority) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            priority,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification channel not configured")]
    NotConfigured,

    #[error("notification rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),
}
