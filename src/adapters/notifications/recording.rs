//! Channel that keeps notifications in memory for assertions.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::ports::{Notification, NotificationChannel, NotificationError};

#[derive(Default)]
pub struct RecordingNotificationChannel {
    sent: Mutex<Vec<Notification>>,
    failing: AtomicBool,
}

impl RecordingNotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel whose every send is rejected.
    pub fn failing() -> Self {
        let channel = Self::default();
        channel.failing.store(true, Ordering::SeqCst);
        channel
    }

    /// Notifications accepted so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingNotificationChannel {
    async fn send_notification(&self, notification: &Notification) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::Rejected {
                status: 500,
                message: "simulated channel failure".into(),
            });
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}
