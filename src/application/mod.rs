//! Application layer - services and command handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Services wrap a single collaborator concern (the conversation log, the
//! outbound channel, escalation); handlers sequence them.

mod conversation_log;
mod dispatcher;
mod escalation;
mod guest_locks;
pub mod handlers;
pub mod knowledge;

pub use conversation_log::ConversationLog;
pub use dispatcher::{DeliveryReport, OutboundDispatcher};
pub use escalation::{EscalationNotifier, EscalationRequest};
pub use guest_locks::{GuestLockGuard, GuestLocks};
pub use handlers::{
    CreateSupportTicketCommand, CreateSupportTicketHandler, CreateSupportTicketResult,
    PipelineComponents, PipelineOutcome, PipelinePorts, PipelineSettings, PipelineTuning,
    RespondToGuestCommand, RespondToGuestHandler, TicketTransition, UpdateTicketStatusCommand,
    UpdateTicketStatusHandler,
};

use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Awaits a store call, turning an elapsed deadline into a `Timeout` error.
pub(crate) async fn with_deadline<T, F>(
    limit: Duration,
    operation: &str,
    call: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::new(
            ErrorCode::Timeout,
            format!("{} timed out after {}ms", operation, limit.as_millis()),
        )),
    }
}
