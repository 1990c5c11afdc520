//! Conversation repository port.
//!
//! The conversation store is a keyed document repository: one document per
//! guest, read whole and written whole.
//!
//! `find_by_guest_id` followed by `save` is a read-modify-write with no
//! isolation of its own. Callers that need per-guest serialization take a
//! [`GuestLocks`](crate::application::GuestLocks) guard around the pair.

use async_trait::async_trait;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::{DomainError, GuestId};

/// Repository port for Conversation aggregate persistence.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find the conversation for a guest.
    ///
    /// Returns `None` if the guest has never written.
    async fn find_by_guest_id(&self, guest_id: &GuestId)
        -> Result<Option<Conversation>, DomainError>;

    /// Insert or replace the guest's conversation.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ConversationRepository) {}
    }
}
