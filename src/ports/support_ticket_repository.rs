//! Support ticket repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, GuestId, TicketId};
use crate::domain::support::SupportTicket;

/// Repository port for SupportTicket persistence.
///
/// Tickets are never deleted, so there is no delete operation.
#[async_trait]
pub trait SupportTicketRepository: Send + Sync {
    /// Stores a newly opened ticket.
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError>;

    /// Persists a status transition.
    ///
    /// # Errors
    ///
    /// - `TicketNotFound` if the ticket was never saved
    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, DomainError>;

    /// Tickets for a guest, oldest first.
    async fn find_by_guest_id(&self, guest_id: &GuestId) -> Result<Vec<SupportTicket>, DomainError>;
}
