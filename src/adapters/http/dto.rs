//! HTTP DTOs.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::{
    CreateSupportTicketCommand, PipelineOutcome, RespondToGuestCommand, TicketTransition,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::resolution::AnswerSource;
use crate::domain::support::TicketPriority;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Inbound guest message, already normalised by the webhook relay.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestMessageRequest {
    pub guest_id: String,
    pub reservation_id: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub listing_map_id: Option<String>,
    pub message: String,
}

impl From<GuestMessageRequest> for RespondToGuestCommand {
    fn from(req: GuestMessageRequest) -> Self {
        Self {
            guest_id: req.guest_id,
            reservation_id: req.reservation_id,
            conversation_id: req.conversation_id,
            listing_map_id: req.listing_map_id,
            message: req.message,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub guest_id: String,
    pub reservation_id: String,
    #[serde(default)]
    pub listing_map_id: Option<String>,
    pub question: String,
    pub reason: String,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl From<CreateTicketRequest> for CreateSupportTicketCommand {
    fn from(req: CreateTicketRequest) -> Self {
        Self {
            guest_id: req.guest_id,
            reservation_id: req.reservation_id,
            listing_map_id: req.listing_map_id,
            question: req.question,
            reason: req.reason,
            priority: req.priority,
            metadata: req.metadata,
        }
    }
}

/// Lifecycle step for a ticket, tagged by `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TicketTransitionRequest {
    Assign { assignee: String },
    Resolve { resolution: String },
    Close,
}

impl From<TicketTransitionRequest> for TicketTransition {
    fn from(req: TicketTransitionRequest) -> Self {
        match req {
            TicketTransitionRequest::Assign { assignee } => TicketTransition::Assign { assignee },
            TicketTransitionRequest::Resolve { resolution } => {
                TicketTransition::Resolve { resolution }
            }
            TicketTransitionRequest::Close => TicketTransition::Close,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Pipeline outcome as returned to the webhook relay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestReplyResponse {
    pub response: String,
    pub source: AnswerSource,
    pub detected_field: String,
    pub confidence: f64,
    pub requires_escalation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub persisted: bool,
    pub processing_time_ms: u64,
}

impl From<PipelineOutcome> for GuestReplyResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        let resolution = &outcome.resolution;
        Self {
            response: resolution.response().to_string(),
            source: resolution.source(),
            detected_field: resolution.detected_field().to_string(),
            confidence: resolution.confidence().value(),
            requires_escalation: resolution.requires_escalation(),
            escalation_reason: resolution.escalation_reason().map(str::to_string),
            sent: outcome.sent,
            message_id: outcome.message_id,
            error: outcome.error,
            ticket_id: outcome.ticket_id.map(|id| id.to_string()),
            persisted: outcome.persisted,
            processing_time_ms: outcome.processing_time_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketResponse {
    pub success: bool,
    pub ticket_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Error payload for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed.to_string(),
            message: message.into(),
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message.clone(),
        }
    }
}
