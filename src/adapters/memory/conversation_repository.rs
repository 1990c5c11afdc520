//! In-memory conversation store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::lock;
use crate::domain::conversation::Conversation;
use crate::domain::foundation::{DomainError, GuestId};
use crate::ports::ConversationRepository;

/// Keyed document store holding one conversation per guest.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    conversations: Mutex<HashMap<GuestId, Conversation>>,
    fail_reads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored conversation.
    pub fn with_conversation(self, conversation: Conversation) -> Self {
        lock(&self.conversations).insert(conversation.guest_id().clone(), conversation);
        self
    }

    /// Makes every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent save fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the stored conversation for a guest.
    pub fn get(&self, guest_id: &GuestId) -> Option<Conversation> {
        lock(&self.conversations).get(guest_id).cloned()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_by_guest_id(
        &self,
        guest_id: &GuestId,
    ) -> Result<Option<Conversation>, DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated conversation read failure"));
        }
        Ok(lock(&self.conversations).get(guest_id).cloned())
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated conversation save failure"));
        }
        lock(&self.conversations).insert(conversation.guest_id().clone(), conversation.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Message;

    fn guest() -> GuestId {
        GuestId::new("guest-1").unwrap()
    }

    #[tokio::test]
    async fn save_then_find_returns_copy() {
        let repo = InMemoryConversationRepository::new();
        let mut conversation = Conversation::new(guest());
        conversation.append(Message::guest("hello").unwrap());

        repo.save(&conversation).await.unwrap();

        let found = repo.find_by_guest_id(&guest()).await.unwrap().unwrap();
        assert_eq!(found.messages().len(), 1);
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn unknown_guest_is_none() {
        let repo = InMemoryConversationRepository::new();
        assert!(repo.find_by_guest_id(&guest()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failure_toggles_apply() {
        let repo = InMemoryConversationRepository::new();
        repo.fail_saves(true);
        assert!(repo.save(&Conversation::new(guest())).await.is_err());

        repo.fail_reads(true);
        assert!(repo.find_by_guest_id(&guest()).await.is_err());
        assert_eq!(repo.save_count(), 0);
    }
}
