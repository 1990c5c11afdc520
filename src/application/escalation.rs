//! EscalationNotifier - sole writer of support tickets.
//!
//! Every escalation opens exactly one ticket and attempts exactly one push
//! notification. The push is best-effort: its failure is logged and never
//! reaches the caller.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::with_deadline;
use crate::domain::foundation::{Confidence, DomainError, GuestId, ListingId, ReservationId};
use crate::domain::resolution::{AnswerSource, EscalationReason};
use crate::domain::support::{NewTicket, SupportTicket};
use crate::ports::{Notification, NotificationChannel, SupportTicketRepository};

/// Everything a human needs to pick up a guest question.
#[derive(Debug, Clone)]
pub struct EscalationRequest {
    pub guest_id: GuestId,
    pub reservation_id: ReservationId,
    pub listing_id: Option<ListingId>,
    pub question: String,
    /// Reply the guest received, if any.
    pub response: Option<String>,
    pub reason: EscalationReason,
    /// Diagnostic text of the failure that caused the escalation.
    pub error: Option<String>,
    pub source: Option<AnswerSource>,
    pub confidence: Option<Confidence>,
    /// Escalation the resolution itself asked for, when a later stage failure
    /// took precedence.
    pub resolution_reason: Option<EscalationReason>,
}

impl EscalationRequest {
    fn metadata(&self) -> serde_json::Value {
        json!({
            "response": self.response,
            "error": self.error,
            "reasonCode": self.reason,
            "resolutionReason": self.resolution_reason,
            "source": self.source,
            "confidence": self.confidence,
        })
    }
}

pub struct EscalationNotifier {
    tickets: Arc<dyn SupportTicketRepository>,
    channel: Option<Arc<dyn NotificationChannel>>,
    timeout: Duration,
}

impl EscalationNotifier {
    pub fn new(
        tickets: Arc<dyn SupportTicketRepository>,
        channel: Option<Arc<dyn NotificationChannel>>,
        timeout: Duration,
    ) -> Self {
        Self {
            tickets,
            channel,
            timeout,
        }
    }

    /// Opens a ticket for a pipeline escalation.
    ///
    /// Priority comes from the reason code; attached error text forces high.
    pub async fn notify(&self, request: EscalationRequest) -> Result<SupportTicket, DomainError> {
        let priority = request.reason.priority(request.error.is_some());
        let metadata = request.metadata();

        self.open_ticket(NewTicket {
            guest_id: request.guest_id,
            reservation_id: request.reservation_id,
            listing_id: request.listing_id,
            question: request.question,
            reason: request.reason.description().to_string(),
            priority,
            metadata,
        })
        .await
    }

    /// Persists a new ticket, then pushes a notification about it.
    ///
    /// The push is attempted even when the ticket could not be stored.
    pub async fn open_ticket(&self, new: NewTicket) -> Result<SupportTicket, DomainError> {
        let ticket = SupportTicket::open(new)?;

        let stored = with_deadline(self.timeout, "ticket save", self.tickets.save(&ticket)).await;
        match &stored {
            Ok(()) => tracing::info!(
                ticket_id = %ticket.id(),
                guest_id = %ticket.guest_id(),
                priority = %ticket.priority(),
                "support ticket opened"
            ),
            Err(err) => tracing::error!(
                guest_id = %ticket.guest_id(),
                error = %err,
                "failed to store support ticket"
            ),
        }

        self.push(&ticket, stored.is_ok()).await;
        stored.map(|()| ticket)
    }

    async fn push(&self, ticket: &SupportTicket, stored: bool) {
        let Some(channel) = &self.channel else {
            tracing::debug!(ticket_id = %ticket.id(), "no notification channel configured");
            return;
        };

        let mut notification = Notification::new(
            format!("Guest needs assistance ({})", ticket.priority()),
            ticket.question(),
            ticket.priority(),
        )
        .with_field("Guest", ticket.guest_id().as_str())
        .with_field("Reservation", ticket.reservation_id().as_str())
        .with_field("Reason", ticket.reason());
        if let Some(listing) = ticket.listing_id() {
            notification = notification.with_field("Listing", listing.as_str());
        }
        if let Some(error) = ticket.metadata().get("error").and_then(|e| e.as_str()) {
            notification = notification.with_field("Error", error);
        }
        notification = if stored {
            notification.with_field("Ticket", ticket.id().to_string())
        } else {
            notification.with_field("Ticket", "not stored")
        };

        match tokio::time::timeout(self.timeout, channel.send_notification(&notification)).await {
            Ok(Ok(())) => tracing::debug!(ticket_id = %ticket.id(), "escalation notification sent"),
            Ok(Err(err)) => {
                tracing::warn!(ticket_id = %ticket.id(), error = %err, "escalation notification failed")
            }
            Err(_) => tracing::warn!(ticket_id = %ticket.id(), "escalation notification timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySupportTicketRepository;
    use crate::adapters::notifications::RecordingNotificationChannel;
    use crate::domain::support::TicketPriority;

    fn request(reason: EscalationReason, error: Option<&str>) -> EscalationRequest {
        EscalationRequest {
            guest_id: GuestId::new("guest-1").unwrap(),
            reservation_id: ReservationId::new("r-1").unwrap(),
            listing_id: Some(ListingId::new("1001").unwrap()),
            question: "Where do I park?".into(),
            response: Some("Please ask your host.".into()),
            reason,
            error: error.map(str::to_string),
            source: Some(AnswerSource::AiFallback),
            confidence: Some(Confidence::new(0.5)),
            resolution_reason: None,
        }
    }

    struct Fixture {
        tickets: Arc<InMemorySupportTicketRepository>,
        channel: Arc<RecordingNotificationChannel>,
        notifier: EscalationNotifier,
    }

    fn fixture(channel: RecordingNotificationChannel) -> Fixture {
        let tickets = Arc::new(InMemorySupportTicketRepository::new());
        let channel = Arc::new(channel);
        let notifier = EscalationNotifier::new(
            tickets.clone(),
            Some(channel.clone()),
            Duration::from_secs(1),
        );
        Fixture {
            tickets,
            channel,
            notifier,
        }
    }

    mod priority {
        use super::*;

        #[tokio::test]
        async fn no_answer_is_medium() {
            let f = fixture(RecordingNotificationChannel::new());

            let ticket = f.notifier.notify(request(EscalationReason::NoAnswerFound, None)).await.unwrap();

            assert_eq!(ticket.priority(), TicketPriority::Medium);
            assert_eq!(ticket.reason(), "No answer found in knowledge bases (listing/FAQ)");
        }

        #[tokio::test]
        async fn low_confidence_is_low() {
            let f = fixture(RecordingNotificationChannel::new());

            let ticket = f
                .notifier
                .notify(request(EscalationReason::LowConfidenceFaq, None))
                .await
                .unwrap();

            assert_eq!(ticket.priority(), TicketPriority::Low);
        }

        #[tokio::test]
        async fn attached_error_is_high() {
            let f = fixture(RecordingNotificationChannel::new());

            let ticket = f
                .notifier
                .notify(request(EscalationReason::DispatchFailed, Some("gateway down")))
                .await
                .unwrap();

            assert_eq!(ticket.priority(), TicketPriority::High);
            assert_eq!(ticket.metadata()["error"], "gateway down");
            assert_eq!(ticket.metadata()["reasonCode"], "dispatch_failed");
        }
    }

    mod side_effects {
        use super::*;

        #[tokio::test]
        async fn creates_one_ticket_and_one_push() {
            let f = fixture(RecordingNotificationChannel::new());

            f.notifier.notify(request(EscalationReason::NoAnswerFound, None)).await.unwrap();

            assert_eq!(f.tickets.count(), 1);
            let sent = f.channel.sent();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].text, "Where do I park?");
        }

        #[tokio::test]
        async fn push_failure_does_not_block_ticket() {
            let f = fixture(RecordingNotificationChannel::failing());

            let result = f.notifier.notify(request(EscalationReason::NoAnswerFound, None)).await;

            assert!(result.is_ok());
            assert_eq!(f.tickets.count(), 1);
        }

        #[tokio::test]
        async fn ticket_store_failure_still_pushes_and_reports() {
            let f = fixture(RecordingNotificationChannel::new());
            f.tickets.fail_saves(true);

            let result = f.notifier.notify(request(EscalationReason::AllSourcesFailed, None)).await;

            assert!(result.is_err());
            assert_eq!(f.channel.sent().len(), 1);
        }

        #[tokio::test]
        async fn works_without_a_channel() {
            let tickets = Arc::new(InMemorySupportTicketRepository::new());
            let notifier = EscalationNotifier::new(tickets.clone(), None, Duration::from_secs(1));

            notifier.notify(request(EscalationReason::NoAnswerFound, None)).await.unwrap();

            assert_eq!(tickets.count(), 1);
        }
    }
}
