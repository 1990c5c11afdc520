//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the guest messaging domain.

mod confidence;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use confidence::Confidence;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{GuestId, ListingId, ReservationId, TicketId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
