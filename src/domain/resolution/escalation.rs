//! Escalation reason codes and their priority table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::support::TicketPriority;

/// Why a reply needs a human to follow up.
///
/// Each failure branch of the pipeline produces exactly one of these; ticket
/// priority is looked up from the code rather than parsed from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    LowConfidenceListing,
    LowConfidenceFaq,
    NoAnswerFound,
    AiInvalidResponse,
    AllSourcesFailed,
    DispatchFailed,
    PersistenceFailed,
    PipelineError,
}

impl EscalationReason {
    /// Fixed human-readable text for the reason.
    pub fn description(&self) -> &'static str {
        match self {
            EscalationReason::LowConfidenceListing => "Low confidence in listing data response",
            EscalationReason::LowConfidenceFaq => "Low confidence in FAQ response",
            EscalationReason::NoAnswerFound => "No answer found in knowledge bases (listing/FAQ)",
            EscalationReason::AiInvalidResponse => "AI service returned invalid response",
            EscalationReason::AllSourcesFailed => "Technical failure: all knowledge sources failed",
            EscalationReason::DispatchFailed => {
                "Technical failure: response could not be delivered to guest"
            }
            EscalationReason::PersistenceFailed => {
                "Technical failure: conversation could not be saved"
            }
            EscalationReason::PipelineError => "Technical failure: unexpected pipeline error",
        }
    }

    /// Returns true when the reason is a technical failure rather than a
    /// knowledge gap.
    pub fn is_technical(&self) -> bool {
        matches!(
            self,
            EscalationReason::AiInvalidResponse
                | EscalationReason::AllSourcesFailed
                | EscalationReason::DispatchFailed
                | EscalationReason::PersistenceFailed
                | EscalationReason::PipelineError
        )
    }

    /// Ticket priority for this reason.
    ///
    /// Any attached error text forces `High`.
    pub fn priority(&self, has_error: bool) -> TicketPriority {
        if has_error {
            return TicketPriority::High;
        }
        match self {
            EscalationReason::LowConfidenceListing | EscalationReason::LowConfidenceFaq => {
                TicketPriority::Low
            }
            EscalationReason::NoAnswerFound => TicketPriority::Medium,
            EscalationReason::AiInvalidResponse
            | EscalationReason::AllSourcesFailed
            | EscalationReason::DispatchFailed
            | EscalationReason::PersistenceFailed
            | EscalationReason::PipelineError => TicketPriority::High,
        }
    }
}

impl fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
