//! Strongly-typed identifier value objects.
//!
//! Guest, reservation and listing identifiers are issued by the upstream
//! property-management system, so they are opaque non-empty strings.
//! Tickets are ours and use UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Stable identity of a guest. Immutable once a conversation exists for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(String);

impl GuestId {
    /// Creates a new GuestId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::empty_field("guest_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upstream reservation identifier. Messages are sent against a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Creates a new ReservationId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::empty_field("reservation_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upstream listing map identifier (the key used by `findByMapId`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    /// Creates a new ListingId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::empty_field("listing_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random TicketId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TicketId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TicketId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_id_accepts_non_empty_string() {
        let id = GuestId::new("guest-123").unwrap();
        assert_eq!(id.as_str(), "guest-123");
    }

    #[test]
    fn guest_id_rejects_empty_string() {
        let result = GuestId::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "guest_id"),
            other => panic!("expected EmptyField, got {:?}", other),
        }
    }

    #[test]
    fn guest_id_rejects_whitespace_only() {
        assert!(GuestId::new("   ").is_err());
    }

    #[test]
    fn guest_id_trims_surrounding_whitespace() {
        let id = GuestId::new("  g-1 ").unwrap();
        assert_eq!(id.to_string(), "g-1");
    }

    #[test]
    fn reservation_and_listing_ids_reject_empty() {
        assert!(ReservationId::new("").is_err());
        assert!(ListingId::new("").is_err());
        assert_eq!(ReservationId::new("42").unwrap().as_str(), "42");
        assert_eq!(ListingId::new("1001").unwrap().as_str(), "1001");
    }

    #[test]
    fn ticket_id_generates_unique_values() {
        assert_ne!(TicketId::new(), TicketId::new());
    }

    #[test]
    fn ticket_id_parses_from_valid_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: TicketId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn string_ids_serialize_transparently() {
        let id = GuestId::new("guest-9").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"guest-9\"");
    }
}
