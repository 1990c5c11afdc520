//! Friendly rewrite - turns a raw fact into a conversational reply.
//!
//! The rewrite never fails outward: when the provider errors or returns
//! nothing, the raw fact is used at a degraded confidence.

use std::sync::Arc;
use std::time::Duration;

use super::{ask, format_history, TurnContext};
use crate::domain::conversation::Message;
use crate::domain::foundation::Confidence;
use crate::ports::{AIProvider, ChatRole, CompletionRequest, PromptPurpose};

/// Rewritten text with the confidence of the rewrite itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub text: String,
    pub confidence: Confidence,
}

pub struct FriendlyRewriter {
    ai: Arc<dyn AIProvider>,
    timeout: Duration,
    history_window: usize,
    confidence: Confidence,
    degraded_confidence: Confidence,
}

impl FriendlyRewriter {
    pub fn new(
        ai: Arc<dyn AIProvider>,
        timeout: Duration,
        history_window: usize,
        confidence: Confidence,
        degraded_confidence: Confidence,
    ) -> Self {
        Self {
            ai,
            timeout,
            history_window,
            confidence,
            degraded_confidence,
        }
    }

    pub async fn rewrite(
        &self,
        fact: &str,
        question: &str,
        history: &[Message],
        context: &TurnContext,
    ) -> Rewrite {
        let property = context
            .listing_label
            .as_deref()
            .map(|label| format!(" at {}", label))
            .unwrap_or_default();
        let system = format!(
            "You are a warm, concise host assistant for guests staying{}. Rewrite the \
             provided information as a friendly reply to the guest's question. Keep every \
             fact exactly as given, add nothing, and answer in the guest's language.",
            property
        );

        let recent = format_history(history, self.history_window);
        let mut prompt = format!("Guest question: {}\nInformation: {}", question, fact);
        if !recent.is_empty() {
            prompt = format!("Recent conversation:\n{}\n\n{}", recent, prompt);
        }

        let request = CompletionRequest::new(context.metadata(PromptPurpose::FriendlyRewrite))
            .with_system_prompt(system)
            .with_message(ChatRole::User, prompt)
            .with_temperature(0.3);

        match ask(self.ai.as_ref(), request, self.timeout).await {
            Ok(text) if !text.is_empty() => Rewrite {
                text,
                confidence: self.confidence,
            },
            Ok(_) => {
                tracing::warn!(guest_id = %context.guest_id, "rewrite returned empty text, using raw fact");
                self.degraded(fact)
            }
            Err(err) => {
                tracing::warn!(guest_id = %context.guest_id, error = %err, "rewrite failed, using raw fact");
                self.degraded(fact)
            }
        }
    }

    fn degraded(&self, fact: &str) -> Rewrite {
        Rewrite {
            text: fact.to_string(),
            confidence: self.degraded_confidence,
        }
    }
}
