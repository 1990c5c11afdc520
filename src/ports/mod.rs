//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Knowledge Ports
//!
//! - `ListingReader` - Property fact sheets by upstream map id
//! - `FaqCorpus` - Curated question/answer pairs
//! - `AIProvider` - Generative-text capability
//!
//! ## Persistence Ports
//!
//! - `ConversationRepository` - Per-guest bounded message log
//! - `SupportTicketRepository` - Escalation tickets
//! - `TokenCache` - TTL-keyed credential cache
//!
//! ## Delivery Ports
//!
//! - `MessagingGateway` - Replies to guests
//! - `NotificationChannel` - Alerts to the support team

mod ai_provider;
mod conversation_repository;
mod faq_corpus;
mod listing_reader;
mod messaging_gateway;
mod notification_channel;
mod support_ticket_repository;
mod token_cache;

pub use ai_provider::{
    AIError, AIProvider, ChatMessage, ChatRole, CompletionRequest, CompletionResponse,
    FinishReason, PromptPurpose, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use conversation_repository::ConversationRepository;
pub use faq_corpus::FaqCorpus;
pub use listing_reader::ListingReader;
pub use messaging_gateway::{GatewayError, MessagingGateway, OutboundMessage, SentMessage};
pub use notification_channel::{Notification, NotificationChannel, NotificationError};
pub use support_ticket_repository::SupportTicketRepository;
pub use token_cache::{CacheError, TokenCache};
