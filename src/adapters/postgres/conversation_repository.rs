//! PostgreSQL implementation of ConversationRepository.
//!
//! One row per guest; messages and summary are stored as JSONB documents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use super::{column, corrupt, db_error};
use crate::domain::conversation::{
    Conversation, ConversationSummary, Message, MessageId, MessageMetadata, Role,
};
use crate::domain::foundation::{DomainError, GuestId, Timestamp};
use crate::ports::ConversationRepository;

#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Stored message shape. Metadata is kept untyped on read so that keys
/// outside the allow-list are dropped instead of failing the whole log.
#[derive(Debug, Serialize, Deserialize)]
struct StoredMessage {
    id: MessageId,
    role: Role,
    content: String,
    timestamp: Timestamp,
    #[serde(default)]
    metadata: serde_json::Value,
}

impl StoredMessage {
    fn from_message(message: &Message) -> Self {
        Self {
            id: *message.id(),
            role: message.role(),
            content: message.content().to_string(),
            timestamp: *message.timestamp(),
            metadata: serde_json::to_value(message.metadata()).unwrap_or_default(),
        }
    }

    fn into_message(self) -> Message {
        Message::reconstitute(
            self.id,
            self.role,
            self.content,
            self.timestamp,
            MessageMetadata::from_json(&self.metadata),
        )
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn find_by_guest_id(
        &self,
        guest_id: &GuestId,
    ) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT guest_id, messages, summary, created_at, last_activity
            FROM guest_conversations
            WHERE guest_id = $1
            "#,
        )
        .bind(guest_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch conversation"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Json(messages): Json<Vec<StoredMessage>> = column(&row, "messages")?;
        let Json(summary): Json<ConversationSummary> = column(&row, "summary")?;
        let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
        let last_activity: chrono::DateTime<chrono::Utc> = column(&row, "last_activity")?;

        Ok(Some(Conversation::reconstitute(
            guest_id.clone(),
            messages.into_iter().map(StoredMessage::into_message).collect(),
            summary,
            Timestamp::from_datetime(created_at),
            Timestamp::from_datetime(last_activity),
        )))
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        let messages: Vec<StoredMessage> = conversation
            .messages()
            .iter()
            .map(StoredMessage::from_message)
            .collect();
        let messages = serde_json::to_value(messages).map_err(|e| corrupt("messages", e))?;
        let summary =
            serde_json::to_value(conversation.summary()).map_err(|e| corrupt("summary", e))?;

        sqlx::query(
            r#"
            INSERT INTO guest_conversations (
                guest_id, messages, summary, created_at, last_activity
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (guest_id) DO UPDATE SET
                messages = EXCLUDED.messages,
                summary = EXCLUDED.summary,
                last_activity = EXCLUDED.last_activity
            "#,
        )
        .bind(conversation.guest_id().as_str())
        .bind(messages)
        .bind(summary)
        .bind(conversation.created_at().as_datetime())
        .bind(conversation.last_activity().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("save conversation"))?;

        Ok(())
    }
}
