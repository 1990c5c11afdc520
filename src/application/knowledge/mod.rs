//! Knowledge sources and the generative steps around them.
//!
//! Ranked by reliability: listing facts, then curated FAQ, then generative
//! fallback. A classifier feeds the listing resolver, and a friendly rewrite
//! turns raw facts into conversational replies.

mod classifier;
mod fallback_resolver;
mod faq_resolver;
mod listing_resolver;
mod rewriter;

pub use classifier::{AiFieldClassifier, FieldClassifier, KeywordFieldClassifier};
pub use fallback_resolver::{FallbackOutcome, GenerativeFallbackResolver};
pub use faq_resolver::{FaqResolver, FAQ_NOT_FOUND};
pub use listing_resolver::{ListingMatch, ListingResolver};
pub use rewriter::{FriendlyRewriter, Rewrite};

use std::time::Duration;
use thiserror::Error;

use crate::domain::conversation::{Message, Role};
use crate::domain::foundation::{DomainError, GuestId};
use crate::ports::{AIError, AIProvider, CompletionRequest, PromptPurpose, RequestMetadata};

/// Why a knowledge source could not produce an answer.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("AI provider error: {0}")]
    Ai(#[from] AIError),

    #[error("{stage} timed out after {secs}s")]
    Timeout { stage: PromptPurpose, secs: u64 },

    #[error("knowledge store error: {0}")]
    Store(#[from] DomainError),
}

/// Per-turn identifiers threaded into every provider request.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub guest_id: GuestId,
    pub trace_id: String,
    /// Short property label ("Casa Azul, Valencia") when a listing is known.
    pub listing_label: Option<String>,
}

impl TurnContext {
    pub fn new(guest_id: GuestId, trace_id: impl Into<String>) -> Self {
        Self {
            guest_id,
            trace_id: trace_id.into(),
            listing_label: None,
        }
    }

    pub fn with_listing_label(mut self, label: Option<String>) -> Self {
        self.listing_label = label;
        self
    }

    pub(crate) fn metadata(&self, purpose: PromptPurpose) -> RequestMetadata {
        RequestMetadata::new(purpose, self.trace_id.clone()).for_guest(self.guest_id.clone())
    }
}

/// Sends one request under a deadline and returns the trimmed text.
pub(crate) async fn ask(
    ai: &dyn AIProvider,
    request: CompletionRequest,
    limit: Duration,
) -> Result<String, ResolverError> {
    let stage = request.metadata.purpose;
    match tokio::time::timeout(limit, ai.complete(request)).await {
        Ok(Ok(response)) => Ok(response.content.trim().to_string()),
        Ok(Err(err)) => Err(ResolverError::Ai(err)),
        Err(_) => Err(ResolverError::Timeout {
            stage,
            secs: limit.as_secs(),
        }),
    }
}

/// Renders the last `window` turns as "Guest: ..." / "Agent: ..." lines.
pub(crate) fn format_history(history: &[Message], window: usize) -> String {
    let start = history.len().saturating_sub(window);
    history[start..]
        .iter()
        .map(|message| {
            let speaker = match message.role() {
                Role::Guest => "Guest",
                Role::Agent => "Agent",
            };
            format!("{}: {}", speaker, message.content())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
