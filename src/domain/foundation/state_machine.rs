//! Transition checks for lifecycle status enums.

use super::{DomainError, ErrorCode};

/// A status enum whose values form a directed transition graph.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + 'static {
    /// Statuses reachable from `self` in one step.
    fn successors(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// Moves to `target`, failing with `InvalidStateTransition` when the edge
    /// does not exist.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("cannot move from {:?} to {:?}", self, target),
        )
        .with_detail("allowed", format!("{:?}", self.successors())))
    }

    /// True when no further transition exists.
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}
