//! UTC instants for message, conversation and ticket records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point in time, always UTC. Serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wraps a value read back from storage.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_as_rfc3339_string() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 7, 1, 15, 0, 0).unwrap());
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-07-01T15:00:00Z\"");

        let back: Timestamp = serde_json::from_str("\"2024-07-01T15:00:00Z\"").unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn later_instant_is_after_earlier() {
        let check_in = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 7, 1, 15, 0, 0).unwrap());
        let check_out = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 7, 4, 11, 0, 0).unwrap());

        assert!(check_out.is_after(&check_in));
        assert!(!check_in.is_after(&check_out));
        assert!(check_in < check_out);
    }
}
