//! The atomic unit of published arrival data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::schedule::{Direction, DirectionalSchedule};

/// Parsed result of one successful refresh.
///
/// Snapshots are immutable once built. The store publishes them behind an
/// `Arc` and replaces the whole value on the next success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub up: DirectionalSchedule,
    pub down: DirectionalSchedule,
    pub fetched_at: DateTime<Utc>,
    pub success: bool,
}

impl Snapshot {
    /// Build a snapshot from a successfully parsed response.
    pub fn new(up: DirectionalSchedule, down: DirectionalSchedule, fetched_at: DateTime<Utc>) -> Self {
        Self {
            up,
            down,
            fetched_at,
            success: true,
        }
    }

    pub fn schedule(&self, direction: Direction) -> &DirectionalSchedule {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Age of the snapshot relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.fetched_at
    }
}
