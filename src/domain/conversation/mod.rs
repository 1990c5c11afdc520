//! Conversation module - bounded per-guest message history.

mod conversation;
mod message;

pub use conversation::{Conversation, ConversationSummary, TopicCount, MAX_MESSAGES};
pub use message::{
    sanitize_content, Message, MessageId, MessageMetadata, Role, ALLOWED_METADATA_KEYS,
    MAX_CONTENT_CHARS,
};
