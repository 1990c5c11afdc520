//! Structured listing resolver.
//!
//! First match wins: the classifier's field, then a keyword scan of the raw
//! question, then the host's special instructions for "how do I" questions.

use crate::domain::foundation::Confidence;
use crate::domain::listing::{Listing, TopicCategory};
use crate::domain::resolution::AnswerSource;

/// Keyword matches are trusted less than classifier matches.
const KEYWORD_PENALTY: f64 = 0.9;

/// Fixed confidence for answering from free-text special instructions.
const SPECIAL_INSTRUCTIONS_CONFIDENCE: f64 = 0.7;

/// Phrases that ask for guidance rather than a specific fact.
const GUIDANCE_MARKERS: &[&str] = &[
    "how do i",
    "how to",
    "help",
    "instructions",
    "cómo",
    "como",
    "ayuda",
    "instrucciones",
];

/// A raw answer taken from listing facts.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingMatch {
    pub answer: String,
    pub confidence: Confidence,
    pub source: AnswerSource,
    /// Canonical field of the matched category, or the detected field for
    /// special instructions.
    pub field: String,
}

/// Looks answers up in a listing's fact sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingResolver;

impl ListingResolver {
    pub fn resolve(
        &self,
        listing: &Listing,
        detected_field: &str,
        question: &str,
    ) -> Option<ListingMatch> {
        self.direct_match(listing, detected_field)
            .or_else(|| self.keyword_match(listing, question))
            .or_else(|| self.special_instructions(listing, detected_field, question))
    }

    fn direct_match(&self, listing: &Listing, detected_field: &str) -> Option<ListingMatch> {
        let category = TopicCategory::from_field(detected_field)?;
        let answer = category.answer(listing)?;
        Some(ListingMatch {
            answer,
            confidence: Confidence::new(category.base_confidence()),
            source: AnswerSource::ListingDirect,
            field: category.field().to_string(),
        })
    }

    fn keyword_match(&self, listing: &Listing, question: &str) -> Option<ListingMatch> {
        TopicCategory::all()
            .filter(|category| category.mentioned_in(question))
            .find_map(|category| {
                category.answer(listing).map(|answer| ListingMatch {
                    answer,
                    confidence: Confidence::new(category.base_confidence() * KEYWORD_PENALTY),
                    source: AnswerSource::ListingKeyword,
                    field: category.field().to_string(),
                })
            })
    }

    fn special_instructions(
        &self,
        listing: &Listing,
        detected_field: &str,
        question: &str,
    ) -> Option<ListingMatch> {
        let instructions = listing.special_instructions()?;
        let lowered = question.to_lowercase();
        if !GUIDANCE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return None;
        }
        Some(ListingMatch {
            answer: instructions.to_string(),
            confidence: Confidence::new(SPECIAL_INSTRUCTIONS_CONFIDENCE),
            source: AnswerSource::ListingSpecial,
            field: detected_field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            check_in_time: Some("15:00".into()),
            wifi_network: Some("CasaAzul".into()),
            wifi_password: Some("sol2024".into()),
            amenities: vec!["pool".into()],
            special_instructions: Some("Ring the bell twice.".into()),
            ..Default::default()
        }
    }

    fn assert_close(actual: Confidence, expected: f64) {
        assert!((actual.value() - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn direct_match_uses_category_confidence() {
        let found = ListingResolver
            .resolve(&listing(), "wifi", "what's the network?")
            .unwrap();

        assert_eq!(found.source, AnswerSource::ListingDirect);
        assert_eq!(found.field, "wifi");
        assert_close(found.confidence, 0.95);
    }

    #[test]
    fn direct_match_accepts_aliases() {
        let found = ListingResolver.resolve(&listing(), "arrival_time", "?").unwrap();
        assert_eq!(found.field, "checkIn");
        assert_eq!(found.source, AnswerSource::ListingDirect);
    }

    #[test]
    fn keyword_match_is_penalized() {
        let found = ListingResolver
            .resolve(&listing(), "unknown", "¿A qué hora es el check-in?")
            .unwrap();

        assert_eq!(found.source, AnswerSource::ListingKeyword);
        assert_eq!(found.field, "checkIn");
        assert_close(found.confidence, 0.81);
    }

    #[test]
    fn direct_category_without_facts_falls_through_to_keywords() {
        let found = ListingResolver
            .resolve(&listing(), "checkOut", "what is the wifi?")
            .unwrap();

        assert_eq!(found.source, AnswerSource::ListingKeyword);
        assert_eq!(found.field, "wifi");
    }

    #[test]
    fn keyword_scan_skips_categories_without_facts() {
        // "door" names access, which this listing lacks; the pool is known
        let found = ListingResolver
            .resolve(&listing(), "unknown", "is the pool by the door?")
            .unwrap();
        assert_eq!(found.field, "amenities");
    }

    #[test]
    fn guidance_questions_get_special_instructions() {
        let found = ListingResolver
            .resolve(&listing(), "unknown", "How do I get in when I arrive late?")
            .unwrap();

        // "arrive" is a check-in keyword, so the fact wins over instructions
        assert_eq!(found.source, AnswerSource::ListingKeyword);

        let found = ListingResolver
            .resolve(&listing(), "unknown", "Necesito ayuda con la basura")
            .unwrap();
        assert_eq!(found.source, AnswerSource::ListingSpecial);
        assert_eq!(found.answer, "Ring the bell twice.");
        assert_close(found.confidence, 0.7);
    }

    #[test]
    fn no_match_returns_none() {
        assert!(ListingResolver
            .resolve(&listing(), "unknown", "Is breakfast included?")
            .is_none());
        assert!(ListingResolver
            .resolve(&Listing::default(), "unknown", "how do I do laundry?")
            .is_none());
    }
}
