//! FAQ module - curated question/answer pairs shared across listings.

use serde::{Deserialize, Serialize};

/// One curated question with its approved answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Entries with a blank question or answer are never offered to the matcher.
    pub fn is_usable(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

/// Renders the corpus as plain text for a matching prompt.
///
/// Unusable entries are skipped; the result is empty when nothing is left.
pub fn render_corpus(entries: &[FaqEntry]) -> String {
    entries
        .iter()
        .filter(|entry| entry.is_usable())
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}. Q: {}\n   A: {}",
                i + 1,
                entry.question.trim(),
                entry.answer.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
