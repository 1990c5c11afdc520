//! PostgreSQL adapters.
//!
//! Schema lives in `migrations/` and is applied by the binary at startup.

mod conversation_repository;
mod listing_reader;
mod ticket_repository;

pub use conversation_repository::PostgresConversationRepository;
pub use listing_reader::PostgresListingReader;
pub use ticket_repository::PostgresSupportTicketRepository;

use sqlx::postgres::PgRow;
use sqlx::{Decode, Postgres, Row, Type};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Wraps a driver error with the operation that failed.
pub(crate) fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", operation, e))
}

/// Reads one column, naming it in the error.
pub(crate) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", name, e),
        )
    })
}

/// Error for a stored value that no longer satisfies domain rules.
pub(crate) fn corrupt(what: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored {}: {}", what, err))
}
