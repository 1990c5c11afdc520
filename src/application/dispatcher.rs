//! OutboundDispatcher - sends resolved text through the messaging gateway.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::ReservationId;
use crate::ports::{GatewayError, MessagingGateway, OutboundMessage};

/// Delivery outcome. A failed send is reported here, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl DeliveryReport {
    fn delivered(message_id: String) -> Self {
        Self {
            sent: true,
            message_id: Some(message_id),
            error: None,
        }
    }

    fn failed(error: &GatewayError) -> Self {
        Self {
            sent: false,
            message_id: None,
            error: Some(error.to_string()),
        }
    }
}

pub struct OutboundDispatcher {
    gateway: Arc<dyn MessagingGateway>,
    timeout: Duration,
}

impl OutboundDispatcher {
    pub fn new(gateway: Arc<dyn MessagingGateway>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    pub async fn dispatch(
        &self,
        reservation_id: &ReservationId,
        conversation_id: Option<&str>,
        text: &str,
    ) -> DeliveryReport {
        let message = OutboundMessage {
            reservation_id: reservation_id.clone(),
            text: text.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        };

        let result = match tokio::time::timeout(
            self.timeout,
            self.gateway.send_message_to_guest(&message),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }),
        };

        match result {
            Ok(sent) => {
                tracing::debug!(reservation_id = %reservation_id, message_id = %sent.id, "reply delivered");
                DeliveryReport::delivered(sent.id)
            }
            Err(err) => {
                tracing::warn!(reservation_id = %reservation_id, error = %err, "reply delivery failed");
                DeliveryReport::failed(&err)
            }
        }
    }
}
