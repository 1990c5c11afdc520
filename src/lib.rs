//! Guest Concierge - automated replies to guest messages for short-term rentals
//!
//! Each inbound message runs through a tiered answer pipeline: the listing's
//! structured facts first, then a curated FAQ, then a generative fallback.
//! Every answer carries a confidence; low-confidence and failed runs open a
//! support ticket for a human. A bounded per-guest conversation log feeds
//! recent history back into every prompt.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
