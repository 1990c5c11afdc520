//! HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    CreateSupportTicketHandler, RespondToGuestHandler, UpdateTicketStatusCommand,
    UpdateTicketStatusHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, TicketId};

use super::dto::{
    CreateTicketRequest, CreateTicketResponse, ErrorResponse, GuestMessageRequest,
    GuestReplyResponse, HealthResponse, TicketTransitionRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AppState {
    respond: Arc<RespondToGuestHandler>,
    create_ticket: Arc<CreateSupportTicketHandler>,
    update_ticket: Arc<UpdateTicketStatusHandler>,
}

impl AppState {
    pub fn new(
        respond: Arc<RespondToGuestHandler>,
        create_ticket: Arc<CreateSupportTicketHandler>,
        update_ticket: Arc<UpdateTicketStatusHandler>,
    ) -> Self {
        Self {
            respond,
            create_ticket,
            update_ticket,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /webhooks/guest-messages - Answer an inbound guest message
///
/// Webhook signature verification belongs here, ahead of the pipeline.
pub async fn receive_guest_message(
    State(state): State<AppState>,
    Json(req): Json<GuestMessageRequest>,
) -> Json<GuestReplyResponse> {
    let outcome = state.respond.execute(req.into()).await;
    Json(outcome.into())
}

/// POST /support-tickets - Open a ticket manually
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(req): Json<CreateTicketRequest>,
) -> Response {
    match state.create_ticket.execute(req.into()).await {
        Ok(result) => (
            StatusCode::CREATED,
            Json(CreateTicketResponse {
                success: result.success,
                ticket_id: result.ticket_id.to_string(),
            }),
        )
            .into_response(),
        Err(e) => handle_domain_error(e),
    }
}

/// POST /support-tickets/:id/transitions - Move a ticket through its lifecycle
pub async fn transition_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
    Json(req): Json<TicketTransitionRequest>,
) -> Response {
    let ticket_id = match ticket_id.parse::<TicketId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid ticket ID")),
            )
                .into_response()
        }
    };

    let cmd = UpdateTicketStatusCommand {
        ticket_id,
        transition: req.into(),
    };

    match state.update_ticket.execute(cmd).await {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::ConversationNotFound | ErrorCode::ListingNotFound | ErrorCode::TicketNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_domain_error(err: DomainError) -> Response {
    let status = status_for(err.code());
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    (status, Json(ErrorResponse::from(&err))).into_response()
}
