//! Answer pipeline configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::{PipelineSettings, PipelineTuning};
use crate::domain::foundation::Confidence;
use crate::domain::resolution::{CompositionRule, ConfidenceGate, DEFAULT_ESCALATION_THRESHOLD};

use super::error::ValidationError;

/// Confidence policy and history sizes of the answer pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Final confidence strictly below this escalates
    pub escalation_threshold: f64,
    pub composition: CompositionRule,
    pub faq_confidence: f64,
    pub rewrite_confidence: f64,
    /// Used when the rewrite fails and the raw fact is sent
    pub degraded_rewrite_confidence: f64,
    pub ai_fallback_confidence: f64,
    /// Prior messages shown to each prompt
    pub history_window: usize,
    /// Stored messages read per run
    pub history_fetch: usize,
    /// Serialize runs for the same guest around the log read-modify-write
    pub serialize_guest_writes: bool,
    /// Deadline in seconds for store and ticket calls
    pub store_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: DEFAULT_ESCALATION_THRESHOLD,
            composition: CompositionRule::default(),
            faq_confidence: 0.85,
            rewrite_confidence: 0.9,
            degraded_rewrite_confidence: 0.6,
            ai_fallback_confidence: 0.5,
            history_window: 3,
            history_fetch: 10,
            serialize_guest_writes: true,
            store_timeout_secs: 10,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let scores = [
            ("pipeline.escalation_threshold", self.escalation_threshold),
            ("pipeline.faq_confidence", self.faq_confidence),
            ("pipeline.rewrite_confidence", self.rewrite_confidence),
            ("pipeline.degraded_rewrite_confidence", self.degraded_rewrite_confidence),
            ("pipeline.ai_fallback_confidence", self.ai_fallback_confidence),
        ];
        for (name, value) in scores {
            if Confidence::try_new(value).is_err() {
                return Err(ValidationError::ConfidenceOutOfRange(name));
            }
        }
        if self.history_fetch < self.history_window {
            return Err(ValidationError::InvalidHistoryWindow);
        }
        if self.store_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("pipeline.store_timeout_secs"));
        }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            gate: ConfidenceGate::new(Confidence::new(self.escalation_threshold), self.composition),
            faq_confidence: Confidence::new(self.faq_confidence),
            history_fetch: self.history_fetch,
        }
    }

    /// Component knobs, with the AI and gateway deadlines owned by their sections.
    pub fn tuning(&self, ai_timeout: Duration, gateway_timeout: Duration) -> PipelineTuning {
        PipelineTuning {
            ai_timeout,
            gateway_timeout,
            store_timeout: self.store_timeout(),
            history_window: self.history_window,
            rewrite_confidence: Confidence::new(self.rewrite_confidence),
            degraded_rewrite_confidence: Confidence::new(self.degraded_rewrite_confidence),
            fallback_confidence: Confidence::new(self.ai_fallback_confidence),
            serialize_guest_writes: self.serialize_guest_writes,
        }
    }
}
