//! Message entity for guest conversations.
//!
//! Messages are immutable records of guest/agent exchanges. Content is
//! sanitized on construction and metadata is restricted to a closed key set
//! so the stored log schema stays stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::foundation::{Confidence, DomainError, Timestamp, ValidationError};
use crate::domain::resolution::AnswerSource;

/// Maximum number of characters stored for a single message.
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Unique identifier for a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message. Closed set: there is no system role in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The guest asking questions.
    Guest,
    /// The automated agent (or a human replying through it).
    Agent,
}

impl Role {
    /// Returns the stored tag for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Agent => "agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "agent" => Ok(Role::Agent),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Metadata keys accepted into the log. Anything else is dropped.
pub const ALLOWED_METADATA_KEYS: [&str; 7] = [
    "source",
    "detectedField",
    "confidence",
    "processingTimeMs",
    "reservationId",
    "conversationId",
    "messageId",
];

/// Per-message metadata restricted to a fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    /// Knowledge source that produced an agent answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<AnswerSource>,
    /// Canonical topic field detected for the question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_field: Option<String>,
    /// Final confidence of an agent answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// Wall-clock time the pipeline spent on this turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
    /// Upstream reservation the message belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
    /// Upstream conversation the message belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    /// Upstream message id returned by the messaging gateway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl MessageMetadata {
    /// Builds metadata from an untyped JSON object.
    ///
    /// Keys outside [`ALLOWED_METADATA_KEYS`] are dropped silently, as are
    /// allowed keys whose value has the wrong shape.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let field = |key: &str| map.get(key).filter(|v| !v.is_null());
        let string = |key: &str| field(key).and_then(|v| v.as_str()).map(str::to_string);

        Self {
            source: field("source").and_then(|v| serde_json::from_value(v.clone()).ok()),
            detected_field: string("detectedField"),
            confidence: field("confidence")
                .and_then(|v| v.as_f64())
                .and_then(|c| Confidence::try_new(c).ok()),
            processing_time_ms: field("processingTimeMs").and_then(|v| v.as_u64()),
            reservation_id: string("reservationId"),
            conversation_id: string("conversationId"),
            message_id: string("messageId"),
        }
    }

    /// Returns true when no key is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Trims and caps message content.
pub fn sanitize_content(content: &str) -> String {
    let trimmed = content.trim();
    match trimmed.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((byte_idx, _)) => trimmed[..byte_idx].to_string(),
        None => trimmed.to_string(),
    }
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `content` is non-empty, trimmed, and at most [`MAX_CONTENT_CHARS`] chars
/// - `timestamp` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    timestamp: Timestamp,
    #[serde(default)]
    metadata: MessageMetadata,
}

impl Message {
    /// Creates a new message, sanitizing its content.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if content is empty after trimming
    pub fn new(
        role: Role,
        content: impl AsRef<str>,
        metadata: MessageMetadata,
    ) -> Result<Self, DomainError> {
        let content = sanitize_content(content.as_ref());
        if content.is_empty() {
            return Err(ValidationError::empty_field("content").into());
        }

        Ok(Self {
            id: MessageId::new(),
            role,
            content,
            timestamp: Timestamp::now(),
            metadata,
        })
    }

    /// Creates a guest message without metadata.
    pub fn guest(content: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::new(Role::Guest, content, MessageMetadata::default())
    }

    /// Creates an agent message without metadata.
    pub fn agent(content: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::new(Role::Agent, content, MessageMetadata::default())
    }

    /// Reconstitutes a message from persistence (no validation).
    pub fn reconstitute(
        id: MessageId,
        role: Role,
        content: String,
        timestamp: Timestamp,
        metadata: MessageMetadata,
    ) -> Self {
        Self {
            id,
            role,
            content,
            timestamp,
            metadata,
        }
    }

    /// Returns the message ID.
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was created.
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Returns the metadata.
    pub fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }

    /// Returns true if this message is from the guest.
    pub fn is_guest(&self) -> bool {
        self.role == Role::Guest
    }
}
