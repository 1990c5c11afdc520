//! Support ticket command handlers.

mod create_support_ticket;
mod update_ticket_status;

pub use create_support_ticket::{
    CreateSupportTicketCommand, CreateSupportTicketHandler, CreateSupportTicketResult,
};
pub use update_ticket_status::{
    TicketTransition, UpdateTicketStatusCommand, UpdateTicketStatusHandler,
};
