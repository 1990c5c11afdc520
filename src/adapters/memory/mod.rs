//! In-memory adapters for tests and local runs.
//!
//! Every store can be switched into a failing mode so callers can exercise
//! their degradation paths without a real backend.

mod conversation_repository;
mod faq_corpus;
mod listing_reader;
mod messaging_gateway;
mod ticket_repository;

pub use conversation_repository::InMemoryConversationRepository;
pub use faq_corpus::InMemoryFaqCorpus;
pub use listing_reader::InMemoryListingReader;
pub use messaging_gateway::RecordingMessagingGateway;
pub use ticket_repository::InMemorySupportTicketRepository;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
