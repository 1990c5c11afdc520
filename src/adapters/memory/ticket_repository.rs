//! In-memory support ticket store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::lock;
use crate::domain::foundation::{DomainError, ErrorCode, GuestId, TicketId};
use crate::domain::support::SupportTicket;
use crate::ports::SupportTicketRepository;

#[derive(Default)]
pub struct InMemorySupportTicketRepository {
    tickets: Mutex<Vec<SupportTicket>>,
    fail_saves: AtomicBool,
}

impl InMemorySupportTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// All stored tickets in creation order.
    pub fn tickets(&self) -> Vec<SupportTicket> {
        lock(&self.tickets).clone()
    }

    pub fn count(&self) -> usize {
        lock(&self.tickets).len()
    }
}

#[async_trait]
impl SupportTicketRepository for InMemorySupportTicketRepository {
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated ticket save failure"));
        }
        lock(&self.tickets).push(ticket.clone());
        Ok(())
    }

    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated ticket update failure"));
        }
        let mut tickets = lock(&self.tickets);
        match tickets.iter_mut().find(|t| t.id() == ticket.id()) {
            Some(stored) => {
                *stored = ticket.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket {} not found", ticket.id()),
            )),
        }
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, DomainError> {
        Ok(lock(&self.tickets).iter().find(|t| t.id() == *id).cloned())
    }

    async fn find_by_guest_id(&self, guest_id: &GuestId) -> Result<Vec<SupportTicket>, DomainError> {
        Ok(lock(&self.tickets)
            .iter()
            .filter(|t| t.guest_id() == guest_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ReservationId;
    use crate::domain::support::{NewTicket, TicketPriority};

    fn ticket(guest: &str) -> SupportTicket {
        SupportTicket::open(NewTicket {
            guest_id: GuestId::new(guest).unwrap(),
            reservation_id: ReservationId::new("r-1").unwrap(),
            listing_id: None,
            question: "Where is the key?".into(),
            reason: "No answer found".into(),
            priority: TicketPriority::Medium,
            metadata: serde_json::json!({}),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn update_replaces_stored_ticket() {
        let repo = InMemorySupportTicketRepository::new();
        let mut stored = ticket("g-1");
        repo.save(&stored).await.unwrap();

        stored.assign("ana").unwrap();
        repo.update(&stored).await.unwrap();

        let found = repo.find_by_id(&stored.id()).await.unwrap().unwrap();
        assert_eq!(found.assigned_to(), Some("ana"));
    }

    #[tokio::test]
    async fn update_of_unknown_ticket_is_not_found() {
        let repo = InMemorySupportTicketRepository::new();
        let err = repo.update(&ticket("g-1")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::TicketNotFound);
    }

    #[tokio::test]
    async fn finds_tickets_by_guest() {
        let repo = InMemorySupportTicketRepository::new();
        repo.save(&ticket("g-1")).await.unwrap();
        repo.save(&ticket("g-2")).await.unwrap();
        repo.save(&ticket("g-1")).await.unwrap();

        let found = repo.find_by_guest_id(&GuestId::new("g-1").unwrap()).await.unwrap();
        assert_eq!(found.len(), 2);
    }
}
