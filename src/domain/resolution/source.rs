//! Closed set of answer sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which knowledge source (or fallback) produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerSource {
    /// Listing fact sheet, category chosen by the field classifier.
    ListingDirect,
    /// Listing fact sheet, category found by keyword scan of the question.
    ListingKeyword,
    /// Listing free-text special instructions.
    ListingSpecial,
    /// Curated FAQ corpus.
    Faq,
    /// Generic guidance from the generative fallback.
    AiFallback,
    /// The generative fallback answered with nothing usable.
    TechnicalFallback,
    /// Every knowledge source missed or failed.
    EmergencyFallback,
    /// The pipeline itself failed.
    Error,
}

impl AnswerSource {
    /// Returns the wire tag for this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::ListingDirect => "listing-direct",
            AnswerSource::ListingKeyword => "listing-keyword",
            AnswerSource::ListingSpecial => "listing-special",
            AnswerSource::Faq => "faq",
            AnswerSource::AiFallback => "ai-fallback",
            AnswerSource::TechnicalFallback => "technical-fallback",
            AnswerSource::EmergencyFallback => "emergency-fallback",
            AnswerSource::Error => "error",
        }
    }

    /// Returns true for the three listing-backed sources.
    pub fn is_listing(&self) -> bool {
        matches!(
            self,
            AnswerSource::ListingDirect | AnswerSource::ListingKeyword | AnswerSource::ListingSpecial
        )
    }

    /// Returns true when a verified knowledge source backs the answer.
    pub fn is_verified(&self) -> bool {
        self.is_listing() || *self == AnswerSource::Faq
    }
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
