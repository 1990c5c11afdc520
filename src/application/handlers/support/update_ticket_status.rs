//! UpdateTicketStatusHandler - moves a ticket through its lifecycle.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, TicketId};
use crate::domain::support::SupportTicket;
use crate::ports::SupportTicketRepository;

/// A lifecycle step requested by a human agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketTransition {
    Assign { assignee: String },
    Resolve { resolution: String },
    Close,
}

#[derive(Debug, Clone)]
pub struct UpdateTicketStatusCommand {
    pub ticket_id: TicketId,
    pub transition: TicketTransition,
}

pub struct UpdateTicketStatusHandler {
    tickets: Arc<dyn SupportTicketRepository>,
}

impl UpdateTicketStatusHandler {
    pub fn new(tickets: Arc<dyn SupportTicketRepository>) -> Self {
        Self { tickets }
    }

    #[tracing::instrument(skip(self, cmd), fields(ticket_id = %cmd.ticket_id))]
    pub async fn execute(&self, cmd: UpdateTicketStatusCommand) -> Result<SupportTicket, DomainError> {
        let mut ticket = self.tickets.find_by_id(&cmd.ticket_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket {} not found", cmd.ticket_id),
            )
        })?;

        match cmd.transition {
            TicketTransition::Assign { assignee } => ticket.assign(assignee)?,
            TicketTransition::Resolve { resolution } => ticket.resolve(resolution)?,
            TicketTransition::Close => ticket.close()?,
        }

        self.tickets.update(&ticket).await?;
        tracing::info!(status = %ticket.status().as_str(), "ticket status updated");
        Ok(ticket)
    }
}
