//! In-memory listing lookup keyed by upstream map id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::foundation::{DomainError, ListingId};
use crate::domain::listing::Listing;
use crate::ports::ListingReader;

#[derive(Default)]
pub struct InMemoryListingReader {
    listings: HashMap<ListingId, Listing>,
    failing: AtomicBool,
}

impl InMemoryListingReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, id: ListingId, listing: Listing) -> Self {
        self.listings.insert(id, listing);
        self
    }

    pub fn fail_reads(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ListingReader for InMemoryListingReader {
    async fn find_by_map_id(&self, id: &ListingId) -> Result<Option<Listing>, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated listing read failure"));
        }
        Ok(self.listings.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_seeded_listing_by_map_id() {
        let id = ListingId::new("1001").unwrap();
        let reader = InMemoryListingReader::new().with_listing(
            id.clone(),
            Listing {
                check_in_time: Some("15:00".into()),
                ..Default::default()
            },
        );

        let listing = reader.find_by_map_id(&id).await.unwrap().unwrap();
        assert_eq!(listing.check_in_time.as_deref(), Some("15:00"));

        let missing = ListingId::new("2002").unwrap();
        assert!(reader.find_by_map_id(&missing).await.unwrap().is_none());
    }
}
