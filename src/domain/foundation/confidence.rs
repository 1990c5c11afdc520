//! Confidence value object (0.0-1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// An answer-reliability score between 0.0 and 1.0 inclusive.
///
/// Scores from different pipeline stages are composed multiplicatively, so the
/// product of two confidences is never greater than either factor.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// No confidence at all.
    pub const ZERO: Self = Self(0.0);

    /// Full confidence.
    pub const CERTAIN: Self = Self(1.0);

    /// Creates a new Confidence, clamping to the valid range.
    ///
    /// NaN collapses to zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a Confidence, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::invalid_format(
                "confidence",
                format!("{} is outside [0, 1]", value),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw score.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Multiplies two confidences.
    pub fn times(self, other: Confidence) -> Confidence {
        Self::new(self.0 * other.0)
    }

    /// Returns the lower of two confidences.
    pub fn min(self, other: Confidence) -> Confidence {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }

    /// Returns true when the score is strictly below `threshold`.
    pub fn is_below(&self, threshold: Confidence) -> bool {
        self.0 < threshold.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
