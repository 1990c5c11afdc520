//! Domain layer - pure types and policies with no I/O.

pub mod conversation;
pub mod faq;
pub mod foundation;
pub mod listing;
pub mod resolution;
pub mod support;
