//! HTTP adapter - the inbound webhook and support-ticket endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | liveness |
//! | POST | `/webhooks/guest-messages` | answer a guest message |
//! | POST | `/support-tickets` | open a ticket manually |
//! | POST | `/support-tickets/:id/transitions` | assign, resolve or close |

pub mod dto;
mod handlers;
mod router;

pub use handlers::AppState;
pub use router::app_router;
