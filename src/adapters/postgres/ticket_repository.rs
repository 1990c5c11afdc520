//! PostgreSQL implementation of SupportTicketRepository.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use super::{column, corrupt, db_error};
use crate::domain::foundation::{
    DomainError, ErrorCode, GuestId, ListingId, ReservationId, TicketId, Timestamp,
};
use crate::domain::support::SupportTicket;
use crate::ports::SupportTicketRepository;

const TICKET_COLUMNS: &str = "id, guest_id, reservation_id, listing_id, question, reason, \
    priority, status, assigned_to, resolution, metadata, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresSupportTicketRepository {
    pool: PgPool,
}

impl PostgresSupportTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupportTicketRepository for PostgresSupportTicketRepository {
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO support_tickets (
                id, guest_id, reservation_id, listing_id, question, reason,
                priority, status, assigned_to, resolution, metadata, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(ticket.id().as_uuid())
        .bind(ticket.guest_id().as_str())
        .bind(ticket.reservation_id().as_str())
        .bind(ticket.listing_id().map(|id| id.as_str()))
        .bind(ticket.question())
        .bind(ticket.reason())
        .bind(ticket.priority().as_str())
        .bind(ticket.status().as_str())
        .bind(ticket.assigned_to())
        .bind(ticket.resolution())
        .bind(ticket.metadata())
        .bind(ticket.created_at().as_datetime())
        .bind(ticket.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert support ticket"))?;

        Ok(())
    }

    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE support_tickets SET
                status = $2,
                assigned_to = $3,
                resolution = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(ticket.id().as_uuid())
        .bind(ticket.status().as_str())
        .bind(ticket.assigned_to())
        .bind(ticket.resolution())
        .bind(ticket.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update support ticket"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket not found: {}", ticket.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<SupportTicket>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM support_tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch support ticket"))?;

        row.map(row_to_ticket).transpose()
    }

    async fn find_by_guest_id(&self, guest_id: &GuestId) -> Result<Vec<SupportTicket>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM support_tickets WHERE guest_id = $1 ORDER BY created_at DESC",
            TICKET_COLUMNS
        ))
        .bind(guest_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch support tickets by guest"))?;

        rows.into_iter().map(row_to_ticket).collect()
    }
}

fn row_to_ticket(row: PgRow) -> Result<SupportTicket, DomainError> {
    let id: uuid::Uuid = column(&row, "id")?;
    let guest_id: String = column(&row, "guest_id")?;
    let reservation_id: String = column(&row, "reservation_id")?;
    let listing_id: Option<String> = column(&row, "listing_id")?;
    let priority: String = column(&row, "priority")?;
    let status: String = column(&row, "status")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(&row, "updated_at")?;

    Ok(SupportTicket::reconstitute(
        TicketId::from_uuid(id),
        GuestId::new(guest_id).map_err(|e| corrupt("guest_id", e))?,
        ReservationId::new(reservation_id).map_err(|e| corrupt("reservation_id", e))?,
        listing_id
            .map(ListingId::new)
            .transpose()
            .map_err(|e| corrupt("listing_id", e))?,
        column(&row, "question")?,
        column(&row, "reason")?,
        priority.parse().map_err(|e| corrupt("priority", e))?,
        status.parse().map_err(|e| corrupt("status", e))?,
        column(&row, "assigned_to")?,
        column(&row, "resolution")?,
        column(&row, "metadata")?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
