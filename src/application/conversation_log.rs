//! ConversationLog - sole writer of persisted guest messages.
//!
//! Content is sanitized and metadata filtered to the allow-list before it
//! reaches the aggregate; the aggregate applies the 50-entry bound.

use std::sync::Arc;
use std::time::Duration;

use super::with_deadline;
use crate::domain::conversation::{Conversation, Message, MessageMetadata, Role};
use crate::domain::foundation::{DomainError, GuestId};
use crate::ports::ConversationRepository;

pub struct ConversationLog {
    repository: Arc<dyn ConversationRepository>,
    timeout: Duration,
}

impl ConversationLog {
    pub fn new(repository: Arc<dyn ConversationRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    /// Loads the guest's conversation, starting an empty one if none exists.
    pub async fn load(&self, guest_id: &GuestId) -> Result<Conversation, DomainError> {
        let found = with_deadline(
            self.timeout,
            "conversation read",
            self.repository.find_by_guest_id(guest_id),
        )
        .await?;
        Ok(found.unwrap_or_else(|| Conversation::new(guest_id.clone())))
    }

    /// Returns up to `count` most recent messages, oldest first.
    pub async fn recent(&self, guest_id: &GuestId, count: usize) -> Result<Vec<Message>, DomainError> {
        let conversation = self.load(guest_id).await?;
        Ok(conversation.recent(count).to_vec())
    }

    /// Appends one message to an already-loaded conversation without saving.
    pub fn record(
        &self,
        conversation: &mut Conversation,
        role: Role,
        content: &str,
        metadata: &serde_json::Value,
    ) -> Result<Message, DomainError> {
        let message = Message::new(role, content, MessageMetadata::from_json(metadata))?;
        Ok(conversation.append(message).clone())
    }

    /// Loads, appends and saves a single message.
    ///
    /// This is a read-modify-write with no isolation of its own; see
    /// [`GuestLocks`](super::GuestLocks).
    pub async fn append(
        &self,
        guest_id: &GuestId,
        role: Role,
        content: &str,
        metadata: &serde_json::Value,
    ) -> Result<Message, DomainError> {
        let mut conversation = self.load(guest_id).await?;
        let message = self.record(&mut conversation, role, content, metadata)?;
        self.save(&conversation).await?;
        Ok(message)
    }

    pub async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        with_deadline(
            self.timeout,
            "conversation save",
            self.repository.save(conversation),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConversationRepository;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    fn guest() -> GuestId {
        GuestId::new("guest-1").unwrap()
    }

    fn log(repo: Arc<InMemoryConversationRepository>) -> ConversationLog {
        ConversationLog::new(repo, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn append_creates_conversation_on_first_message() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let log = log(repo.clone());

        let message = log.append(&guest(), Role::Guest, "  hello  ", &json!({})).await.unwrap();

        assert_eq!(message.content(), "hello");
        let stored = repo.get(&guest()).unwrap();
        assert_eq!(stored.messages().len(), 1);
        assert_eq!(stored.summary().total_messages, 1);
    }

    #[tokio::test]
    async fn append_drops_unknown_metadata_keys() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let log = log(repo.clone());

        let message = log
            .append(
                &guest(),
                Role::Agent,
                "The WiFi password is sunny123.",
                &json!({ "source": "listing-direct", "detectedField": "wifi", "prompt": "secret" }),
            )
            .await
            .unwrap();

        let stored = serde_json::to_value(message.metadata()).unwrap();
        assert_eq!(stored["detectedField"], "wifi");
        assert!(stored.get("prompt").is_none());
    }

    #[tokio::test]
    async fn recent_returns_tail() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let log = log(repo);
        for i in 1..=4 {
            log.append(&guest(), Role::Guest, &format!("m{}", i), &json!({})).await.unwrap();
        }

        let recent = log.recent(&guest(), 2).await.unwrap();

        let contents: Vec<_> = recent.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);
    }

    #[tokio::test]
    async fn append_keeps_cap_after_many_writes() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let log = log(repo.clone());
        for i in 1..=55 {
            log.append(&guest(), Role::Guest, &format!("m{}", i), &json!({})).await.unwrap();
        }

        let stored = repo.get(&guest()).unwrap();
        assert_eq!(stored.messages().len(), 50);
        assert_eq!(stored.messages()[0].content(), "m6");
    }

    #[tokio::test]
    async fn empty_content_is_rejected() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        let err = log(repo.clone())
            .append(&guest(), Role::Guest, "   ", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::EmptyField);
        assert!(repo.get(&guest()).is_none());
    }

    #[tokio::test]
    async fn save_failure_propagates() {
        let repo = Arc::new(InMemoryConversationRepository::new());
        repo.fail_saves(true);

        let result = log(repo).append(&guest(), Role::Guest, "hi", &json!({})).await;

        assert_eq!(result.unwrap_err().code(), ErrorCode::DatabaseError);
    }
}
