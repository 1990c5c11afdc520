//! Messaging gateway that records outbound messages instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::lock;
use crate::ports::{GatewayError, MessagingGateway, OutboundMessage, SentMessage};

#[derive(Default)]
pub struct RecordingMessagingGateway {
    sent: Mutex<Vec<OutboundMessage>>,
    failing: AtomicBool,
}

impl RecordingMessagingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that rejects every message.
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail_sends(true);
        gateway
    }

    pub fn fail_sends(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    /// Messages accepted so far, in send order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl MessagingGateway for RecordingMessagingGateway {
    async fn send_message_to_guest(
        &self,
        message: &OutboundMessage,
    ) -> Result<SentMessage, GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::rejected(503, "simulated gateway outage"));
        }
        let mut sent = lock(&self.sent);
        sent.push(message.clone());
        Ok(SentMessage {
            id: format!("msg-{}", sent.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ReservationId;

    fn outbound(text: &str) -> OutboundMessage {
        OutboundMessage {
            reservation_id: ReservationId::new("r-1").unwrap(),
            text: text.to_string(),
            conversation_id: None,
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let gateway = RecordingMessagingGateway::new();

        let first = gateway.send_message_to_guest(&outbound("one")).await.unwrap();
        let second = gateway.send_message_to_guest(&outbound("two")).await.unwrap();

        assert_eq!(first.id, "msg-1");
        assert_eq!(second.id, "msg-2");
        assert_eq!(gateway.sent().len(), 2);
    }

    #[tokio::test]
    async fn failing_gateway_records_nothing() {
        let gateway = RecordingMessagingGateway::failing();
        assert!(gateway.send_message_to_guest(&outbound("x")).await.is_err());
        assert!(gateway.sent().is_empty());
    }
}
