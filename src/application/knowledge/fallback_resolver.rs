//! Generative fallback - general guidance when no verified source answers.
//!
//! Answers from here are never verified, so the pipeline always escalates
//! them regardless of the confidence attached.

use std::sync::Arc;
use std::time::Duration;

use super::{ask, format_history, ResolverError, TurnContext};
use crate::domain::conversation::Message;
use crate::domain::foundation::Confidence;
use crate::ports::{AIProvider, ChatRole, CompletionRequest, PromptPurpose};

/// What the generative fallback produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackOutcome {
    /// Usable guidance text.
    Answered { response: String, confidence: Confidence },
    /// The provider replied but with nothing usable.
    Invalid,
}

pub struct GenerativeFallbackResolver {
    ai: Arc<dyn AIProvider>,
    timeout: Duration,
    history_window: usize,
    confidence: Confidence,
}

impl GenerativeFallbackResolver {
    pub fn new(
        ai: Arc<dyn AIProvider>,
        timeout: Duration,
        history_window: usize,
        confidence: Confidence,
    ) -> Self {
        Self {
            ai,
            timeout,
            history_window,
            confidence,
        }
    }

    pub async fn resolve(
        &self,
        question: &str,
        history: &[Message],
        context: &TurnContext,
    ) -> Result<FallbackOutcome, ResolverError> {
        let property = context
            .listing_label
            .as_deref()
            .map(|label| format!("The guest is staying at {}. ", label))
            .unwrap_or_default();
        let system = format!(
            "You are a helpful vacation-rental host assistant. {}You do not have verified \
             information for this question. Give brief, generally useful guidance without \
             inventing specific facts such as codes, times, or addresses, and recommend that \
             the guest contact their host for specifics. Answer in the guest's language.",
            property
        );

        let recent = format_history(history, self.history_window);
        let prompt = if recent.is_empty() {
            format!("Guest question: {}", question)
        } else {
            format!("Recent conversation:\n{}\n\nGuest question: {}", recent, question)
        };

        let request = CompletionRequest::new(context.metadata(PromptPurpose::GenerativeFallback))
            .with_system_prompt(system)
            .with_message(ChatRole::User, prompt)
            .with_temperature(0.5);

        let response = ask(self.ai.as_ref(), request, self.timeout).await?;
        if response.is_empty() {
            tracing::warn!(guest_id = %context.guest_id, "generative fallback returned empty text");
            return Ok(FallbackOutcome::Invalid);
        }

        Ok(FallbackOutcome::Answered {
            response,
            confidence: self.confidence,
        })
    }
}
