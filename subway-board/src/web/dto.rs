//! Response DTOs for the JSON API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::accessor::FieldAccessor;
use crate::domain::{Direction, Rank};
use crate::refresh::{Current, RefreshFailure, RefreshStatus};

/// Response for the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Whether any refresh has succeeded yet
    pub ready: bool,
    pub last_update_success: bool,
    pub consecutive_failures: u32,
    pub last_error: Option<RefreshFailure>,
    /// Seconds since the published snapshot was fetched
    pub snapshot_age_secs: Option<i64>,
}

impl HealthResponse {
    pub fn new(current: &Current, status: RefreshStatus, now: DateTime<Utc>) -> Self {
        Self {
            ready: current.is_ready(),
            snapshot_age_secs: current.snapshot().map(|s| s.age(now).num_seconds()),
            last_update_success: status.last_update_success,
            consecutive_failures: status.consecutive_failures,
            last_error: status.last_error,
        }
    }
}

/// One (direction, rank) lookup.
#[derive(Debug, Serialize)]
pub struct ArrivalResponse {
    pub direction: Direction,
    pub rank: Rank,
    /// `None` when the rank is beyond the known arrivals
    pub destination: Option<String>,
    pub minutes: Option<f64>,
}

impl ArrivalResponse {
    pub fn from_fields(fields: &FieldAccessor<'_>, direction: Direction, rank: Rank) -> Self {
        Self {
            direction,
            rank,
            destination: fields
                .destination_at(direction, rank)
                .into_option()
                .map(str::to_string),
            minutes: fields.minutes_at(direction, rank).into_option(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArrivalEntry, DirectionalSchedule, Snapshot};
    use chrono::Utc;

    #[test]
    fn arrival_response_fields() {
        let up: DirectionalSchedule = std::iter::once(ArrivalEntry::new("Seoul", 3.0)).collect();
        let snapshot = Snapshot::new(up, DirectionalSchedule::default(), Utc::now());
        let fields = FieldAccessor::new(&snapshot);

        let found = ArrivalResponse::from_fields(&fields, Direction::Up, Rank::FIRST);
        assert_eq!(found.destination.as_deref(), Some("Seoul"));
        assert_eq!(found.minutes, Some(3.0));

        let missing = ArrivalResponse::from_fields(&fields, Direction::Down, Rank::FIRST);
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"direction": "down", "rank": 1, "destination": null, "minutes": null})
        );
    }

    #[test]
    fn health_from_status() {
        let health = HealthResponse::new(&Current::NoData, RefreshStatus::default(), Utc::now());
        assert!(!health.ready);
        assert!(!health.last_update_success);
        assert!(health.last_error.is_none());
        assert!(health.snapshot_age_secs.is_none());
    }

    #[test]
    fn health_reports_snapshot_age() {
        use chrono::TimeZone;
        use std::sync::Arc;

        let fetched_at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let snapshot = Snapshot::new(
            DirectionalSchedule::default(),
            DirectionalSchedule::default(),
            fetched_at,
        );
        let current = Current::Ready(Arc::new(snapshot));
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 45).unwrap();

        let health = HealthResponse::new(&current, RefreshStatus::default(), now);
        assert!(health.ready);
        assert_eq!(health.snapshot_age_secs, Some(45));
    }
}
