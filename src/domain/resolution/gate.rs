//! ConfidenceGate - confidence composition and escalation policy.
//!
//! Two constants carry the whole pipeline: the escalation threshold (0.7) and
//! the multiplicative composition rule. Both are configurable, both default to
//! those values.

use serde::Deserialize;

use crate::domain::foundation::Confidence;

use super::{AnswerSource, EscalationReason, ResolutionResult};

/// Default escalation threshold.
pub const DEFAULT_ESCALATION_THRESHOLD: f64 = 0.7;

/// How a source confidence and a rewrite confidence are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionRule {
    /// `source × rewrite`; a weak rewrite degrades a certain fact.
    #[default]
    Multiplicative,
    /// `min(source, rewrite)`.
    Minimum,
}

/// Decides final confidence and whether a reply must be escalated.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceGate {
    threshold: Confidence,
    rule: CompositionRule,
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(
            Confidence::new(DEFAULT_ESCALATION_THRESHOLD),
            CompositionRule::default(),
        )
    }
}

impl ConfidenceGate {
    /// Creates a gate with an explicit threshold and composition rule.
    pub fn new(threshold: Confidence, rule: CompositionRule) -> Self {
        Self { threshold, rule }
    }

    pub fn threshold(&self) -> Confidence {
        self.threshold
    }

    /// Combines the confidence of a source with that of its rewrite.
    pub fn compose(&self, source: Confidence, rewrite: Confidence) -> Confidence {
        match self.rule {
            CompositionRule::Multiplicative => source.times(rewrite),
            CompositionRule::Minimum => source.min(rewrite),
        }
    }

    /// Returns the escalation reason for an answer, if it needs one.
    ///
    /// Verified sources escalate only below the threshold; every unverified
    /// source escalates unconditionally.
    pub fn escalation_for(
        &self,
        source: AnswerSource,
        confidence: Confidence,
    ) -> Option<EscalationReason> {
        let below = confidence.is_below(self.threshold);
        match source {
            AnswerSource::ListingDirect
            | AnswerSource::ListingKeyword
            | AnswerSource::ListingSpecial => {
                below.then_some(EscalationReason::LowConfidenceListing)
            }
            AnswerSource::Faq => below.then_some(EscalationReason::LowConfidenceFaq),
            AnswerSource::AiFallback => Some(EscalationReason::NoAnswerFound),
            AnswerSource::TechnicalFallback => Some(EscalationReason::AiInvalidResponse),
            AnswerSource::EmergencyFallback => Some(EscalationReason::AllSourcesFailed),
            AnswerSource::Error => Some(EscalationReason::PipelineError),
        }
    }

    /// Builds the final result for an answer, applying the escalation policy.
    pub fn finalize(
        &self,
        response: impl Into<String>,
        source: AnswerSource,
        detected_field: impl Into<String>,
        confidence: Confidence,
    ) -> ResolutionResult {
        let escalation = self.escalation_for(source, confidence);
        ResolutionResult::new(response, source, detected_field, confidence, escalation)
    }
}
