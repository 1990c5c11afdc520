//! Listing module - property fact sheets and the topic category table.

mod listing;
mod topic;

pub use listing::Listing;
pub use topic::{CategoryEntry, TopicCategory};
