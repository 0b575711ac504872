//! Refresh bookkeeping and health metadata.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

use crate::kakao::{FailureKind, FetchError};

/// Throttle bookkeeping owned by the refresh manager.
///
/// Only the manager touches this, under its own lock.
#[derive(Debug, Default)]
pub struct RefreshState {
    last_attempt: Option<Instant>,
    sequence: u64,
}

impl RefreshState {
    /// Whether an attempt at `now` falls inside the minimum interval.
    pub fn is_throttled(&self, now: Instant, min_interval: Duration) -> bool {
        self.last_attempt
            .is_some_and(|last| now.saturating_duration_since(last) < min_interval)
    }

    /// Record the start of an attempt and return its sequence number.
    pub fn begin_attempt(&mut self, now: Instant) -> u64 {
        self.last_attempt = Some(now);
        self.sequence += 1;
        self.sequence
    }

    /// Number of attempts started so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// A classified refresh failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshFailure {
    pub kind: FailureKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl RefreshFailure {
    pub fn from_error(error: &FetchError, at: DateTime<Utc>) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            at,
        }
    }
}

/// Health of the most recent refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshStatus {
    /// Whether the latest completed attempt succeeded.
    pub last_update_success: bool,
    /// Failure of the latest attempt; cleared by the next success.
    pub last_error: Option<RefreshFailure>,
    /// Failures since the last success.
    pub consecutive_failures: u32,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
}

impl RefreshStatus {
    pub(crate) fn record_success(&mut self, at: DateTime<Utc>) {
        self.last_update_success = true;
        self.last_error = None;
        self.consecutive_failures = 0;
        self.last_attempt_at = Some(at);
        self.last_success_at = Some(at);
    }

    pub(crate) fn record_failure(&mut self, failure: RefreshFailure) {
        self.last_update_success = false;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_attempt_at = Some(failure.at);
        self.last_error = Some(failure);
    }
}
