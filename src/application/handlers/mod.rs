//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod messaging;
pub mod support;

pub use messaging::{
    PipelineComponents, PipelineOutcome, PipelinePorts, PipelineSettings, PipelineTuning,
    RespondToGuestCommand, RespondToGuestHandler,
};
pub use support::{
    CreateSupportTicketCommand, CreateSupportTicketHandler, CreateSupportTicketResult,
    TicketTransition, UpdateTicketStatusCommand, UpdateTicketStatusHandler,
};
