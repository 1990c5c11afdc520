//! PostgreSQL implementation of ListingReader.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{column, db_error};
use crate::domain::foundation::{DomainError, ListingId};
use crate::domain::listing::Listing;
use crate::ports::ListingReader;

#[derive(Clone)]
pub struct PostgresListingReader {
    pool: PgPool,
}

impl PostgresListingReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingReader for PostgresListingReader {
    async fn find_by_map_id(&self, id: &ListingId) -> Result<Option<Listing>, DomainError> {
        let row = sqlx::query("SELECT facts FROM listings WHERE map_id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch listing"))?;

        match row {
            Some(row) => {
                let Json(listing): Json<Listing> = column(&row, "facts")?;
                Ok(Some(listing))
            }
            None => Ok(None),
        }
    }
}
