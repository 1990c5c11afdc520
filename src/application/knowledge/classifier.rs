//! Field classification - maps a free-text question to a canonical topic field.
//!
//! Classification is advisory: every failure degrades to `"unknown"`.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{ask, format_history, TurnContext};
use crate::domain::conversation::Message;
use crate::domain::listing::TopicCategory;
use crate::domain::resolution::UNKNOWN_FIELD;
use crate::ports::{AIProvider, ChatRole, CompletionRequest, PromptPurpose};

/// Characters that end the first token of a classifier response.
const TOKEN_SEPARATORS: &[char] = &[' ', '\n', '\t', ',', '.', ';', ':', '"', '\'', '`', '(', ')', '!', '?'];

/// Maps a question to one of `candidates`, or `"unknown"`.
#[async_trait]
pub trait FieldClassifier: Send + Sync {
    async fn classify(
        &self,
        question: &str,
        history: &[Message],
        candidates: &[&str],
        context: &TurnContext,
    ) -> String;
}

/// Classifier backed by the generative-text provider.
pub struct AiFieldClassifier {
    ai: Arc<dyn AIProvider>,
    timeout: Duration,
    history_window: usize,
}

impl AiFieldClassifier {
    pub fn new(ai: Arc<dyn AIProvider>, timeout: Duration, history_window: usize) -> Self {
        Self {
            ai,
            timeout,
            history_window,
        }
    }

    fn build_request(
        &self,
        question: &str,
        history: &[Message],
        candidates: &[&str],
        context: &TurnContext,
    ) -> CompletionRequest {
        let system = format!(
            "You classify guest questions about a vacation rental. Reply with exactly one \
             word from this list: {}, unknown. Reply \"unknown\" when none fits.",
            candidates.join(", ")
        );

        let recent = format_history(history, self.history_window);
        let prompt = if recent.is_empty() {
            format!("Question: {}", question)
        } else {
            format!("Recent conversation:\n{}\n\nQuestion: {}", recent, question)
        };

        CompletionRequest::new(context.metadata(PromptPurpose::ClassifyField))
            .with_system_prompt(system)
            .with_message(ChatRole::User, prompt)
            .with_max_tokens(10)
            .with_temperature(0.0)
    }
}

/// Truncates a raw response to its first token and matches it, ignoring case.
pub(crate) fn parse_field(raw: &str, candidates: &[&str]) -> String {
    let token = raw
        .trim()
        .split(TOKEN_SEPARATORS)
        .find(|t| !t.is_empty())
        .unwrap_or_default();

    candidates
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(token))
        .map(|candidate| candidate.to_string())
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
}

#[async_trait]
impl FieldClassifier for AiFieldClassifier {
    async fn classify(
        &self,
        question: &str,
        history: &[Message],
        candidates: &[&str],
        context: &TurnContext,
    ) -> String {
        if candidates.is_empty() {
            return UNKNOWN_FIELD.to_string();
        }

        let request = self.build_request(question, history, candidates, context);
        match ask(self.ai.as_ref(), request, self.timeout).await {
            Ok(raw) => {
                let field = parse_field(&raw, candidates);
                tracing::debug!(guest_id = %context.guest_id, field = %field, "classified question");
                field
            }
            Err(err) => {
                tracing::warn!(
                    guest_id = %context.guest_id,
                    error = %err,
                    "field classification failed, using unknown"
                );
                UNKNOWN_FIELD.to_string()
            }
        }
    }
}

/// Classifier that scans the question for category keywords, no provider call.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordFieldClassifier;

#[async_trait]
impl FieldClassifier for KeywordFieldClassifier {
    async fn classify(
        &self,
        question: &str,
        _history: &[Message],
        candidates: &[&str],
        _context: &TurnContext,
    ) -> String {
        TopicCategory::all()
            .filter(|category| candidates.contains(&category.field()))
            .find(|category| category.mentioned_in(question))
            .map(|category| category.field().to_string())
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::GuestId;

    const CANDIDATES: &[&str] = &["checkIn", "checkOut", "wifi"];

    fn context() -> TurnContext {
        TurnContext::new(GuestId::new("guest-1").unwrap(), "trace-1")
    }

    mod parsing {
        use super::*;

        #[test]
        fn takes_first_token_before_separator() {
            assert_eq!(parse_field("wifi. The guest asks about internet", CANDIDATES), "wifi");
            assert_eq!(parse_field("\"checkIn\"", CANDIDATES), "checkIn");
            assert_eq!(parse_field("checkOut,checkIn", CANDIDATES), "checkOut");
        }

        #[test]
        fn matches_case_insensitively_and_returns_canonical_name() {
            assert_eq!(parse_field("CHECKIN", CANDIDATES), "checkIn");
        }

        #[test]
        fn non_candidates_become_unknown() {
            assert_eq!(parse_field("parking", CANDIDATES), "unknown");
            assert_eq!(parse_field("", CANDIDATES), "unknown");
            assert_eq!(parse_field("unknown", CANDIDATES), "unknown");
        }
    }

    mod ai_classifier {
        use super::*;

        #[tokio::test]
        async fn returns_candidate_from_provider() {
            let ai = Arc::new(MockAIProvider::new().with_response("checkIn"));
            let classifier = AiFieldClassifier::new(ai.clone(), Duration::from_secs(1), 3);

            let field = classifier
                .classify("¿A qué hora es el check-in?", &[], CANDIDATES, &context())
                .await;

            assert_eq!(field, "checkIn");
            let calls = ai.get_calls();
            assert_eq!(calls[0].metadata.purpose, PromptPurpose::ClassifyField);
            assert!(calls[0].system_prompt.as_deref().unwrap().contains("checkIn, checkOut, wifi"));
        }

        #[tokio::test]
        async fn provider_failure_degrades_to_unknown() {
            let ai = Arc::new(MockAIProvider::new().with_error(MockError::Unavailable {
                message: "down".into(),
            }));
            let classifier = AiFieldClassifier::new(ai, Duration::from_secs(1), 3);

            let field = classifier.classify("wifi?", &[], CANDIDATES, &context()).await;

            assert_eq!(field, "unknown");
        }

        #[tokio::test]
        async fn timeout_degrades_to_unknown() {
            let ai = Arc::new(
                MockAIProvider::new()
                    .with_response("wifi")
                    .with_delay(Duration::from_millis(200)),
            );
            let classifier = AiFieldClassifier::new(ai, Duration::from_millis(10), 3);

            let field = classifier.classify("wifi?", &[], CANDIDATES, &context()).await;

            assert_eq!(field, "unknown");
        }

        #[tokio::test]
        async fn prompt_includes_at_most_three_history_turns() {
            let ai = Arc::new(MockAIProvider::new().with_response("wifi"));
            let classifier = AiFieldClassifier::new(ai.clone(), Duration::from_secs(1), 3);
            let history: Vec<_> = (1..=5)
                .map(|i| Message::guest(format!("turn {}", i)).unwrap())
                .collect();

            classifier.classify("and the password?", &history, CANDIDATES, &context()).await;

            let prompt = &ai.get_calls()[0].messages[0].content;
            assert!(!prompt.contains("turn 2"));
            assert!(prompt.contains("turn 3"));
            assert!(prompt.contains("turn 5"));
        }

        #[tokio::test]
        async fn empty_candidates_skip_the_provider() {
            let ai = Arc::new(MockAIProvider::new());
            let classifier = AiFieldClassifier::new(ai.clone(), Duration::from_secs(1), 3);

            let field = classifier.classify("hello", &[], &[], &context()).await;

            assert_eq!(field, "unknown");
            assert_eq!(ai.call_count(), 0);
        }
    }

    mod keyword_classifier {
        use super::*;

        #[tokio::test]
        async fn finds_first_mentioned_candidate() {
            let field = KeywordFieldClassifier
                .classify("What's the wifi password?", &[], CANDIDATES, &context())
                .await;
            assert_eq!(field, "wifi");
        }

        #[tokio::test]
        async fn ignores_categories_outside_candidates() {
            let field = KeywordFieldClassifier
                .classify("Is there a pool?", &[], CANDIDATES, &context())
                .await;
            assert_eq!(field, "unknown");
        }
    }
}
