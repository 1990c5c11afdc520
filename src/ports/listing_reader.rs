//! Listing reader port - looks up property fact sheets.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ListingId};
use crate::domain::listing::Listing;

/// Read-only access to listing fact sheets keyed by upstream map id.
#[async_trait]
pub trait ListingReader: Send + Sync {
    /// Returns `None` when no listing is stored under the id.
    async fn find_by_map_id(&self, id: &ListingId) -> Result<Option<Listing>, DomainError>;
}
