//! Support module - escalation tickets for human follow-up.

mod ticket;

pub use ticket::{NewTicket, SupportTicket, TicketPriority, TicketStatus};
