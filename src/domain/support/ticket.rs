//! SupportTicket aggregate - a human follow-up request.
//!
//! Tickets are created exactly once per escalation event and never deleted.
//! Status moves strictly forward: open → in_progress → resolved → closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DomainError, GuestId, ListingId, ReservationId, StateMachine, TicketId, Timestamp,
    ValidationError,
};

/// How urgently a human should look at a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            other => Err(ValidationError::invalid_format(
                "priority",
                format!("unknown priority '{}'", other),
            )),
        }
    }
}

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

impl StateMachine for TicketStatus {
    fn successors(&self) -> &'static [Self] {
        match self {
            TicketStatus::Open => &[TicketStatus::InProgress],
            TicketStatus::InProgress => &[TicketStatus::Resolved],
            TicketStatus::Resolved => &[TicketStatus::Closed],
            TicketStatus::Closed => &[],
        }
    }
}

/// Fields needed to open a ticket.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub guest_id: GuestId,
    pub reservation_id: ReservationId,
    pub listing_id: Option<ListingId>,
    pub question: String,
    pub reason: String,
    pub priority: TicketPriority,
    pub metadata: serde_json::Value,
}

/// A request for a human to follow up with a guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    id: TicketId,
    guest_id: GuestId,
    reservation_id: ReservationId,
    listing_id: Option<ListingId>,
    question: String,
    reason: String,
    priority: TicketPriority,
    status: TicketStatus,
    assigned_to: Option<String>,
    resolution: Option<String>,
    metadata: serde_json::Value,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl SupportTicket {
    /// Opens a new ticket.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if question or reason is empty
    pub fn open(new: NewTicket) -> Result<Self, DomainError> {
        if new.question.trim().is_empty() {
            return Err(ValidationError::empty_field("question").into());
        }
        if new.reason.trim().is_empty() {
            return Err(ValidationError::empty_field("reason").into());
        }

        let now = Timestamp::now();
        Ok(Self {
            id: TicketId::new(),
            guest_id: new.guest_id,
            reservation_id: new.reservation_id,
            listing_id: new.listing_id,
            question: new.question.trim().to_string(),
            reason: new.reason.trim().to_string(),
            priority: new.priority,
            status: TicketStatus::Open,
            assigned_to: None,
            resolution: None,
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitutes a ticket from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TicketId,
        guest_id: GuestId,
        reservation_id: ReservationId,
        listing_id: Option<ListingId>,
        question: String,
        reason: String,
        priority: TicketPriority,
        status: TicketStatus,
        assigned_to: Option<String>,
        resolution: Option<String>,
        metadata: serde_json::Value,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            guest_id,
            reservation_id,
            listing_id,
            question,
            reason,
            priority,
            status,
            assigned_to,
            resolution,
            metadata,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn guest_id(&self) -> &GuestId {
        &self.guest_id
    }

    pub fn reservation_id(&self) -> &ReservationId {
        &self.reservation_id
    }

    pub fn listing_id(&self) -> Option<&ListingId> {
        self.listing_id.as_ref()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn priority(&self) -> TicketPriority {
        self.priority
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Assigns the ticket to a human and starts work on it.
    pub fn assign(&mut self, assignee: impl Into<String>) -> Result<(), DomainError> {
        let assignee = assignee.into();
        if assignee.trim().is_empty() {
            return Err(ValidationError::empty_field("assigned_to").into());
        }
        self.status = self.status.transition_to(TicketStatus::InProgress)?;
        self.assigned_to = Some(assignee);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records how the ticket was resolved.
    pub fn resolve(&mut self, resolution: impl Into<String>) -> Result<(), DomainError> {
        let resolution = resolution.into();
        if resolution.trim().is_empty() {
            return Err(ValidationError::empty_field("resolution").into());
        }
        self.status = self.status.transition_to(TicketStatus::Resolved)?;
        self.resolution = Some(resolution);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Closes a resolved ticket.
    pub fn close(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(TicketStatus::Closed)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
