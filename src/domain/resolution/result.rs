//! ResolutionResult - the pipeline's answer for one guest message.

use crate::domain::foundation::Confidence;

use super::{AnswerSource, EscalationReason};

/// Detected field used when the classifier could not decide.
pub const UNKNOWN_FIELD: &str = "unknown";

/// Canonical reply sent whenever a technical failure prevents a real answer.
///
/// Guests never see raw error text; diagnostics go to the support ticket.
pub const TECHNICAL_DIFFICULTIES_MESSAGE: &str = "Thank you for your message! We're experiencing \
some technical difficulties right now, but our team has been notified and will get back to you \
as soon as possible.";

/// Final, ephemeral outcome of resolving a guest question.
///
/// # Invariants
///
/// - `response` is never empty (the canonical copy is substituted)
/// - an escalation reason is present iff the result requires escalation
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    response: String,
    source: AnswerSource,
    detected_field: String,
    confidence: Confidence,
    escalation: Option<EscalationReason>,
}

impl ResolutionResult {
    /// Builds a result, substituting fallback copy for an empty response.
    pub fn new(
        response: impl Into<String>,
        source: AnswerSource,
        detected_field: impl Into<String>,
        confidence: Confidence,
        escalation: Option<EscalationReason>,
    ) -> Self {
        let response = response.into();
        let response = if response.trim().is_empty() {
            TECHNICAL_DIFFICULTIES_MESSAGE.to_string()
        } else {
            response
        };
        let detected_field = detected_field.into();
        let detected_field = if detected_field.trim().is_empty() {
            UNKNOWN_FIELD.to_string()
        } else {
            detected_field
        };

        Self {
            response,
            source,
            detected_field,
            confidence,
            escalation,
        }
    }

    /// Result for a pipeline failure: canonical copy, zero confidence.
    pub fn pipeline_error(detected_field: impl Into<String>) -> Self {
        Self::new(
            TECHNICAL_DIFFICULTIES_MESSAGE,
            AnswerSource::Error,
            detected_field,
            Confidence::ZERO,
            Some(EscalationReason::PipelineError),
        )
    }

    /// Result for a message rejected before any stage ran.
    ///
    /// Nothing is escalated: a reject has no valid guest to open a ticket for.
    pub fn rejected() -> Self {
        Self::new(
            TECHNICAL_DIFFICULTIES_MESSAGE,
            AnswerSource::Error,
            UNKNOWN_FIELD,
            Confidence::ZERO,
            None,
        )
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn source(&self) -> AnswerSource {
        self.source
    }

    pub fn detected_field(&self) -> &str {
        &self.detected_field
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn escalation(&self) -> Option<EscalationReason> {
        self.escalation
    }

    pub fn requires_escalation(&self) -> bool {
        self.escalation.is_some()
    }

    /// Human-readable escalation reason, present iff escalation is required.
    pub fn escalation_reason(&self) -> Option<&'static str> {
        self.escalation.map(|reason| reason.description())
    }

    /// Marks the result for escalation unless it already carries a reason.
    pub fn escalate(&mut self, reason: EscalationReason) {
        if self.escalation.is_none() {
            self.escalation = Some(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_is_replaced_with_canonical_copy() {
        let result = ResolutionResult::new(
            "   ",
            AnswerSource::AiFallback,
            "wifi",
            Confidence::new(0.5),
            Some(EscalationReason::NoAnswerFound),
        );
        assert_eq!(result.response(), TECHNICAL_DIFFICULTIES_MESSAGE);
    }

    #[test]
    fn empty_field_becomes_unknown() {
        let result = ResolutionResult::new("hi", AnswerSource::Faq, "", Confidence::CERTAIN, None);
        assert_eq!(result.detected_field(), UNKNOWN_FIELD);
    }

    #[test]
    fn reason_present_iff_escalation_required() {
        let calm = ResolutionResult::new("ok", AnswerSource::Faq, "wifi", Confidence::CERTAIN, None);
        assert!(!calm.requires_escalation());
        assert!(calm.escalation_reason().is_none());

        let error = ResolutionResult::pipeline_error("unknown");
        assert!(error.requires_escalation());
        assert!(error.escalation_reason().is_some());
        assert_eq!(error.source(), AnswerSource::Error);
        assert_eq!(error.confidence(), Confidence::ZERO);
    }

    #[test]
    fn rejected_input_is_an_error_without_escalation() {
        let rejected = ResolutionResult::rejected();
        assert_eq!(rejected.source(), AnswerSource::Error);
        assert_eq!(rejected.response(), TECHNICAL_DIFFICULTIES_MESSAGE);
        assert!(!rejected.requires_escalation());
        assert!(rejected.escalation_reason().is_none());
    }

    #[test]
    fn escalate_keeps_first_reason() {
        let mut result = ResolutionResult::new(
            "ok",
            AnswerSource::Faq,
            "wifi",
            Confidence::new(0.5),
            Some(EscalationReason::LowConfidenceFaq),
        );
        result.escalate(EscalationReason::DispatchFailed);
        assert_eq!(result.escalation(), Some(EscalationReason::LowConfidenceFaq));
    }
}
