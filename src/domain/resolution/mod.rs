//! Resolution module - answer sources, escalation policy and final results.

mod escalation;
mod gate;
mod result;
mod source;

pub use escalation::EscalationReason;
pub use gate::{CompositionRule, ConfidenceGate, DEFAULT_ESCALATION_THRESHOLD};
pub use result::{ResolutionResult, TECHNICAL_DIFFICULTIES_MESSAGE, UNKNOWN_FIELD};
pub use source::AnswerSource;
