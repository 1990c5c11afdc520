//! Notification channel adapters.

mod recording;
mod slack;

pub use recording::RecordingNotificationChannel;
pub use slack::{SlackConfig, SlackWebhookChannel};
