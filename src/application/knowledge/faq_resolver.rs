//! Curated FAQ resolver.
//!
//! The provider picks the single best entry from the whole corpus and
//! returns its answer verbatim, or a sentinel when nothing fits.

use std::sync::Arc;
use std::time::Duration;

use super::{ask, format_history, ResolverError, TurnContext};
use crate::domain::conversation::Message;
use crate::domain::faq::render_corpus;
use crate::ports::{AIProvider, ChatRole, CompletionRequest, FaqCorpus, PromptPurpose};

/// Sentinel the provider answers with when no entry matches.
pub const FAQ_NOT_FOUND: &str = "NOT_FOUND";

pub struct FaqResolver {
    ai: Arc<dyn AIProvider>,
    corpus: Arc<dyn FaqCorpus>,
    timeout: Duration,
    history_window: usize,
}

impl FaqResolver {
    pub fn new(
        ai: Arc<dyn AIProvider>,
        corpus: Arc<dyn FaqCorpus>,
        timeout: Duration,
        history_window: usize,
    ) -> Self {
        Self {
            ai,
            corpus,
            timeout,
            history_window,
        }
    }

    /// Returns the matching FAQ answer, or `None` on a miss.
    ///
    /// An empty corpus is a miss without a provider call.
    pub async fn resolve(
        &self,
        question: &str,
        history: &[Message],
        context: &TurnContext,
    ) -> Result<Option<String>, ResolverError> {
        let entries = self.corpus.find_all().await?;
        let corpus = render_corpus(&entries);
        if corpus.is_empty() {
            tracing::debug!(guest_id = %context.guest_id, "FAQ corpus empty, skipping");
            return Ok(None);
        }

        let system = format!(
            "You answer guest questions using only this FAQ list.\n\n{}\n\n\
             If one entry answers the question, reply with that entry's answer exactly as \
             written. If none does, reply with {} and nothing else.",
            corpus, FAQ_NOT_FOUND
        );

        let recent = format_history(history, self.history_window);
        let prompt = if recent.is_empty() {
            format!("Guest question: {}", question)
        } else {
            format!("Recent conversation:\n{}\n\nGuest question: {}", recent, question)
        };

        let request = CompletionRequest::new(context.metadata(PromptPurpose::MatchFaq))
            .with_system_prompt(system)
            .with_message(ChatRole::User, prompt)
            .with_temperature(0.0);

        let answer = ask(self.ai.as_ref(), request, self.timeout).await?;
        Ok(interpret(answer))
    }
}

fn interpret(answer: String) -> Option<String> {
    if answer.is_empty() || answer.to_ascii_uppercase().contains(FAQ_NOT_FOUND) {
        None
    } else {
        Some(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::memory::InMemoryFaqCorpus;
    use crate::domain::faq::FaqEntry;
    use crate::domain::foundation::GuestId;

    fn context() -> TurnContext {
        TurnContext::new(GuestId::new("guest-1").unwrap(), "trace-1")
    }

    fn corpus() -> Arc<InMemoryFaqCorpus> {
        Arc::new(InMemoryFaqCorpus::new(vec![
            FaqEntry::new("Is breakfast included?", "Breakfast is not included."),
            FaqEntry::new("Can I bring pets?", "Only small dogs are allowed."),
        ]))
    }

    fn resolver(ai: Arc<MockAIProvider>, corpus: Arc<InMemoryFaqCorpus>) -> FaqResolver {
        FaqResolver::new(ai, corpus, Duration::from_secs(1), 3)
    }

    #[tokio::test]
    async fn returns_matched_answer() {
        let ai = Arc::new(MockAIProvider::new().with_response("Only small dogs are allowed."));

        let answer = resolver(ai.clone(), corpus())
            .resolve("can my dog come?", &[], &context())
            .await
            .unwrap();

        assert_eq!(answer.as_deref(), Some("Only small dogs are allowed."));
        let system = ai.get_calls()[0].system_prompt.clone().unwrap();
        assert!(system.contains("Can I bring pets?"));
    }

    #[tokio::test]
    async fn sentinel_maps_to_miss() {
        let ai = Arc::new(MockAIProvider::new().with_response("NOT_FOUND"));

        let answer = resolver(ai, corpus())
            .resolve("where is the gym?", &[], &context())
            .await
            .unwrap();

        assert!(answer.is_none());
    }

    #[tokio::test]
    async fn empty_corpus_skips_provider() {
        let ai = Arc::new(MockAIProvider::new());
        let empty = Arc::new(InMemoryFaqCorpus::new(vec![]));

        let answer = resolver(ai.clone(), empty)
            .resolve("anything?", &[], &context())
            .await
            .unwrap();

        assert!(answer.is_none());
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_error_is_reported() {
        let ai = Arc::new(MockAIProvider::new().with_error(MockError::Network {
            message: "reset".into(),
        }));

        let result = resolver(ai, corpus()).resolve("pets?", &[], &context()).await;

        assert!(matches!(result, Err(ResolverError::Ai(_))));
    }

    #[test]
    fn interpret_treats_blank_and_sentinel_as_miss() {
        assert!(interpret(String::new()).is_none());
        assert!(interpret("not_found".to_string()).is_none());
        assert_eq!(interpret("Yes.".to_string()).as_deref(), Some("Yes."));
    }
}
