//! Conversation aggregate - bounded message history for one guest.
//!
//! # Invariants
//!
//! - `guest_id` never changes after creation
//! - `messages.len() <= MAX_MESSAGES` after every mutation (oldest evicted first)
//! - `summary.total_messages == messages.len()` after every mutation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, GuestId, Timestamp, ValidationError};

use super::message::{Message, Role};

/// Maximum number of messages retained per guest.
pub const MAX_MESSAGES: usize = 50;

/// Number of ranked topics kept in the summary.
const MAX_COMMON_TOPICS: usize = 5;

/// Topic field that never counts toward `common_topics`.
const UNKNOWN_TOPIC: &str = "unknown";

/// How often a topic was asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCount {
    pub topic: String,
    pub count: u32,
}

/// Derived aggregate over the message log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub total_messages: usize,
    pub needs_human_support: bool,
    pub common_topics: Vec<TopicCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction_score: Option<f64>,
}

/// Message history for a single guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    guest_id: GuestId,
    messages: Vec<Message>,
    summary: ConversationSummary,
    created_at: Timestamp,
    last_activity: Timestamp,
}

impl Conversation {
    /// Starts an empty conversation for a guest.
    pub fn new(guest_id: GuestId) -> Self {
        let now = Timestamp::now();
        Self {
            guest_id,
            messages: Vec::new(),
            summary: ConversationSummary::default(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Reconstitutes a conversation from persistence.
    ///
    /// The size bound and summary count are re-applied, so a store that
    /// returns an oversized log still yields a valid aggregate.
    pub fn reconstitute(
        guest_id: GuestId,
        messages: Vec<Message>,
        summary: ConversationSummary,
        created_at: Timestamp,
        last_activity: Timestamp,
    ) -> Self {
        let mut conversation = Self {
            guest_id,
            messages,
            summary,
            created_at,
            last_activity,
        };
        conversation.evict_oldest();
        conversation.refresh_summary();
        conversation
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn guest_id(&self) -> &GuestId {
        &self.guest_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn summary(&self) -> &ConversationSummary {
        &self.summary
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn last_activity(&self) -> &Timestamp {
        &self.last_activity
    }

    /// Returns up to `count` most recent messages, oldest first.
    pub fn recent(&self, count: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a message, evicting the oldest entries beyond [`MAX_MESSAGES`].
    pub fn append(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.evict_oldest();
        self.touch();
        self.refresh_summary();
        // push happened above, so the log is non-empty
        &self.messages[self.messages.len() - 1]
    }

    /// Latches the human-support flag. It is only cleared by a human.
    pub fn mark_needs_human_support(&mut self) {
        self.summary.needs_human_support = true;
        self.touch();
    }

    /// Clears the human-support flag once a human has taken over.
    pub fn clear_needs_human_support(&mut self) {
        self.summary.needs_human_support = false;
        self.touch();
    }

    /// Records a guest satisfaction score on a 0-5 scale.
    pub fn record_satisfaction(&mut self, score: f64) -> Result<(), DomainError> {
        if score.is_nan() || !(0.0..=5.0).contains(&score) {
            return Err(ValidationError::out_of_range("satisfaction_score", 0, 5, score as i32).into());
        }
        self.summary.satisfaction_score = Some(score);
        self.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn evict_oldest(&mut self) {
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    fn touch(&mut self) {
        self.last_activity = Timestamp::now();
    }

    fn refresh_summary(&mut self) {
        self.summary.total_messages = self.messages.len();
        self.summary.common_topics = rank_topics(&self.messages);
    }
}

/// Counts detected topics on agent turns, highest count first.
///
/// Ties keep the order in which topics first appeared.
fn rank_topics(messages: &[Message]) -> Vec<TopicCount> {
    let mut counts: HashMap<&str, (usize, u32)> = HashMap::new();

    for (position, message) in messages.iter().enumerate() {
        if message.role() != Role::Agent {
            continue;
        }
        let Some(topic) = message.metadata().detected_field.as_deref() else {
            continue;
        };
        if topic.is_empty() || topic == UNKNOWN_TOPIC {
            continue;
        }
        counts.entry(topic).or_insert((position, 0)).1 += 1;
    }

    let mut ranked: Vec<(&str, usize, u32)> = counts
        .into_iter()
        .map(|(topic, (first_seen, count))| (topic, first_seen, count))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));

    ranked
        .into_iter()
        .take(MAX_COMMON_TOPICS)
        .map(|(topic, _, count)| TopicCount {
            topic: topic.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::MessageMetadata;
    use proptest::prelude::*;

    fn guest() -> GuestId {
        GuestId::new("guest-1").unwrap()
    }

    fn agent_turn(topic: &str) -> Message {
        Message::new(
            Role::Agent,
            format!("answer about {}", topic),
            MessageMetadata {
                detected_field: Some(topic.to_string()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    mod bounded_log {
        use super::*;

        #[test]
        fn new_conversation_is_empty() {
            let conversation = Conversation::new(guest());
            assert!(conversation.messages().is_empty());
            assert_eq!(conversation.summary().total_messages, 0);
        }

        #[test]
        fn evicts_oldest_first_after_cap() {
            let mut conversation = Conversation::new(guest());
            for i in 1..=55 {
                conversation.append(Message::guest(format!("message {}", i)).unwrap());
            }

            assert_eq!(conversation.messages().len(), MAX_MESSAGES);
            assert_eq!(conversation.messages()[0].content(), "message 6");
            assert_eq!(conversation.messages()[49].content(), "message 55");
            assert_eq!(conversation.summary().total_messages, MAX_MESSAGES);
        }

        #[test]
        fn append_returns_the_stored_message() {
            let mut conversation = Conversation::new(guest());
            let stored = conversation.append(Message::guest("  hi  ").unwrap()).clone();
            assert_eq!(stored.content(), "hi");
            assert_eq!(conversation.messages().last(), Some(&stored));
        }

        #[test]
        fn recent_returns_tail_in_order() {
            let mut conversation = Conversation::new(guest());
            for i in 1..=5 {
                conversation.append(Message::guest(format!("m{}", i)).unwrap());
            }

            let recent: Vec<_> = conversation.recent(3).iter().map(|m| m.content()).collect();
            assert_eq!(recent, vec!["m3", "m4", "m5"]);
            assert_eq!(conversation.recent(10).len(), 5);
        }

        #[test]
        fn reconstitute_reapplies_bound() {
            let messages: Vec<_> = (0..60)
                .map(|i| Message::guest(format!("m{}", i)).unwrap())
                .collect();
            let conversation = Conversation::reconstitute(
                guest(),
                messages,
                ConversationSummary::default(),
                Timestamp::now(),
                Timestamp::now(),
            );

            assert_eq!(conversation.messages().len(), MAX_MESSAGES);
            assert_eq!(conversation.messages()[0].content(), "m10");
            assert_eq!(conversation.summary().total_messages, MAX_MESSAGES);
        }

        #[test]
        fn append_updates_last_activity() {
            let mut conversation = Conversation::new(guest());
            let before = *conversation.last_activity();
            std::thread::sleep(std::time::Duration::from_millis(2));
            conversation.append(Message::guest("hello").unwrap());
            assert!(conversation.last_activity().is_after(&before));
        }
    }

    mod summary {
        use super::*;

        #[test]
        fn ranks_topics_by_count_then_first_appearance() {
            let mut conversation = Conversation::new(guest());
            conversation.append(agent_turn("wifi"));
            conversation.append(agent_turn("checkIn"));
            conversation.append(agent_turn("checkIn"));
            conversation.append(agent_turn("parking"));
            conversation.append(agent_turn("unknown"));

            let topics = &conversation.summary().common_topics;
            assert_eq!(topics[0], TopicCount { topic: "checkIn".into(), count: 2 });
            assert_eq!(topics[1].topic, "wifi");
            assert_eq!(topics[2].topic, "parking");
            assert!(topics.iter().all(|t| t.topic != "unknown"));
        }

        #[test]
        fn guest_turns_do_not_count_as_topics() {
            let mut conversation = Conversation::new(guest());
            conversation.append(
                Message::new(
                    Role::Guest,
                    "wifi?",
                    MessageMetadata {
                        detected_field: Some("wifi".into()),
                        ..Default::default()
                    },
                )
                .unwrap(),
            );
            assert!(conversation.summary().common_topics.is_empty());
        }

        #[test]
        fn human_support_flag_latches() {
            let mut conversation = Conversation::new(guest());
            conversation.mark_needs_human_support();
            conversation.append(Message::guest("thanks").unwrap());
            assert!(conversation.summary().needs_human_support);

            conversation.clear_needs_human_support();
            assert!(!conversation.summary().needs_human_support);
        }

        #[test]
        fn satisfaction_score_is_range_checked() {
            let mut conversation = Conversation::new(guest());
            assert!(conversation.record_satisfaction(4.5).is_ok());
            assert_eq!(conversation.summary().satisfaction_score, Some(4.5));
            assert!(conversation.record_satisfaction(7.0).is_err());
            assert!(conversation.record_satisfaction(f64::NAN).is_err());
        }
    }

    proptest! {
        #[test]
        fn length_is_min_of_appends_and_cap(n in 0usize..120) {
            let mut conversation = Conversation::new(guest());
            for i in 0..n {
                conversation.append(Message::guest(format!("m{}", i)).unwrap());
            }
            prop_assert_eq!(conversation.messages().len(), n.min(MAX_MESSAGES));
            prop_assert_eq!(conversation.summary().total_messages, conversation.messages().len());
            if n > 0 {
                let expected_first = format!("m{}", n.saturating_sub(MAX_MESSAGES));
                prop_assert_eq!(conversation.messages()[0].content(), expected_first.as_str());
            }
        }
    }
}
