//! Messaging gateway port - delivers replies to guests.
//!
//! The property-management system owns the guest channel; replies are sent
//! against a reservation, optionally threaded into an upstream conversation.

use async_trait::async_trait;

use crate::domain::foundation::ReservationId;

/// Port for sending a reply to a guest.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Sends `message` and returns the upstream message id.
    async fn send_message_to_guest(
        &self,
        message: &OutboundMessage,
    ) -> Result<SentMessage, GatewayError>;
}

/// A reply ready to be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub reservation_id: ReservationId,
    pub text: String,
    pub conversation_id: Option<String>,
}

/// Upstream acknowledgement of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
}

/// Messaging gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Access token was rejected.
    #[error("gateway rejected credentials")]
    Unauthorized,

    /// Token endpoint failed.
    #[error("token request failed: {0}")]
    TokenRequest(String),

    /// Upstream refused the message.
    #[error("gateway rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Response could not be understood.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl GatewayError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}
