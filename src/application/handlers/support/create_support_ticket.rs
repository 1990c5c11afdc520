//! CreateSupportTicketHandler - opens a ticket outside the reply pipeline.

use std::sync::Arc;

use crate::application::EscalationNotifier;
use crate::domain::foundation::{DomainError, GuestId, ListingId, ReservationId, TicketId};
use crate::domain::support::{NewTicket, TicketPriority};

#[derive(Debug, Clone)]
pub struct CreateSupportTicketCommand {
    pub guest_id: String,
    pub reservation_id: String,
    pub listing_map_id: Option<String>,
    pub question: String,
    pub reason: String,
    /// Defaults to medium.
    pub priority: Option<TicketPriority>,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSupportTicketResult {
    pub success: bool,
    pub ticket_id: TicketId,
}

pub struct CreateSupportTicketHandler {
    notifier: Arc<EscalationNotifier>,
}

impl CreateSupportTicketHandler {
    pub fn new(notifier: Arc<EscalationNotifier>) -> Self {
        Self { notifier }
    }

    #[tracing::instrument(skip(self, cmd), fields(guest_id = %cmd.guest_id))]
    pub async fn execute(
        &self,
        cmd: CreateSupportTicketCommand,
    ) -> Result<CreateSupportTicketResult, DomainError> {
        let new = NewTicket {
            guest_id: GuestId::new(cmd.guest_id)?,
            reservation_id: ReservationId::new(cmd.reservation_id)?,
            listing_id: cmd.listing_map_id.map(ListingId::new).transpose()?,
            question: cmd.question,
            reason: cmd.reason,
            priority: cmd.priority.unwrap_or(TicketPriority::Medium),
            metadata: cmd.metadata,
        };

        let ticket = self.notifier.open_ticket(new).await?;

        Ok(CreateSupportTicketResult {
            success: true,
            ticket_id: ticket.id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySupportTicketRepository;
    use crate::adapters::notifications::RecordingNotificationChannel;
    use crate::domain::foundation::ErrorCode;
    use std::time::Duration;

    struct Fixture {
        tickets: Arc<InMemorySupportTicketRepository>,
        channel: Arc<RecordingNotificationChannel>,
        handler: CreateSupportTicketHandler,
    }

    fn fixture() -> Fixture {
        let tickets = Arc::new(InMemorySupportTicketRepository::new());
        let channel = Arc::new(RecordingNotificationChannel::new());
        let notifier = EscalationNotifier::new(
            tickets.clone(),
            Some(channel.clone()),
            Duration::from_secs(1),
        );
        Fixture {
            tickets,
            channel,
            handler: CreateSupportTicketHandler::new(Arc::new(notifier)),
        }
    }

    fn command() -> CreateSupportTicketCommand {
        CreateSupportTicketCommand {
            guest_id: "guest-1".into(),
            reservation_id: "r-1".into(),
            listing_map_id: Some("1001".into()),
            question: "The heating is broken".into(),
            reason: "Guest reported a maintenance issue".into(),
            priority: Some(TicketPriority::High),
            metadata: serde_json::json!({ "channel": "airbnb" }),
        }
    }

    #[tokio::test]
    async fn opens_ticket_and_notifies() {
        let f = fixture();

        let result = f.handler.execute(command()).await.unwrap();

        assert!(result.success);
        let stored = f.tickets.tickets();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id(), result.ticket_id);
        assert_eq!(stored[0].priority(), TicketPriority::High);
        assert_eq!(stored[0].listing_id().map(|l| l.as_str()), Some("1001"));
        assert_eq!(f.channel.sent().len(), 1);
    }

    #[tokio::test]
    async fn priority_defaults_to_medium() {
        let f = fixture();
        let mut cmd = command();
        cmd.priority = None;

        f.handler.execute(cmd).await.unwrap();

        assert_eq!(f.tickets.tickets()[0].priority(), TicketPriority::Medium);
    }

    #[tokio::test]
    async fn rejects_missing_identifiers() {
        let f = fixture();
        let mut cmd = command();
        cmd.guest_id = "  ".into();

        let err = f.handler.execute(cmd).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::EmptyField);
        assert_eq!(f.tickets.count(), 0);
    }

    #[tokio::test]
    async fn rejects_empty_question() {
        let f = fixture();
        let mut cmd = command();
        cmd.question = String::new();

        assert!(f.handler.execute(cmd).await.is_err());
        assert!(f.channel.sent().is_empty());
    }
}
