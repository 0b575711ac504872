//! Refresh cycle coordination.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::domain::{Snapshot, StationId};
use crate::kakao::{ArrivalSource, FailureKind, FetchError, parse_document};

use super::state::{RefreshFailure, RefreshState};
use super::store::{Current, SnapshotStore};

/// Timing configuration for the refresh manager.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Attempts closer together than this are skipped.
    pub min_interval: Duration,
    /// Upper bound on one fetch, including reading the body.
    pub fetch_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Result of a refresh call that did not fail.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// A new snapshot was fetched and published.
    Updated(Arc<Snapshot>),
    /// Skipped because the previous attempt was too recent.
    Throttled(Current),
}

impl RefreshOutcome {
    /// Whether this call published a new snapshot.
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated(_))
    }
}

/// Owns the refresh cycle for one station.
///
/// Refreshes are serialized: a second caller waits for the first to finish
/// and then sees the throttle. Consumers read through [`SnapshotStore`],
/// which is never locked across the network call.
pub struct RefreshManager<S> {
    station: StationId,
    source: S,
    store: SnapshotStore,
    config: RefreshConfig,
    state: Mutex<RefreshState>,
}

impl<S: ArrivalSource> RefreshManager<S> {
    /// Create a manager bound to `station`, with a fresh store.
    pub fn new(station: StationId, source: S) -> Self {
        Self {
            station,
            source,
            store: SnapshotStore::new(),
            config: RefreshConfig::default(),
            state: Mutex::new(RefreshState::default()),
        }
    }

    /// Replace the default timing.
    pub fn with_config(mut self, config: RefreshConfig) -> Self {
        self.config = config;
        self
    }

    /// Station this manager refreshes.
    pub fn station(&self) -> &StationId {
        &self.station
    }

    /// Handle to the store this manager publishes into.
    pub fn store(&self) -> SnapshotStore {
        self.store.clone()
    }

    /// Run one refresh cycle.
    ///
    /// Within the minimum interval this is a no-op returning the current
    /// snapshot. Otherwise it performs exactly one fetch. On success the new
    /// snapshot replaces the old one wholesale; on failure the old snapshot
    /// stays published, the classified failure is recorded in the store and
    /// returned. Failures are never retried here.
    #[tracing::instrument(name = "refresh", skip(self), fields(station = %self.station))]
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if state.is_throttled(now, self.config.min_interval) {
            debug!("refresh throttled");
            return Ok(RefreshOutcome::Throttled(self.store.current().await));
        }

        let attempt = state.begin_attempt(now);
        debug!(attempt, "starting refresh");

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                let (up, down) = (snapshot.up.len(), snapshot.down.len());
                let snapshot = self.store.replace(snapshot).await;
                info!(attempt, up, down, "refresh succeeded");
                Ok(RefreshOutcome::Updated(snapshot))
            }
            Err(err) => {
                match err.kind() {
                    FailureKind::Schema => {
                        error!(attempt, error = %err, "response shape changed; keeping previous data")
                    }
                    kind => warn!(attempt, %kind, error = %err, "refresh failed; keeping previous data"),
                }
                self.store
                    .record_failure(RefreshFailure::from_error(&err, Utc::now()))
                    .await;
                Err(err)
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let body = tokio::time::timeout(self.config.fetch_timeout, self.source.fetch(&self.station))
            .await
            .map_err(|_| FetchError::Timeout(self.config.fetch_timeout))??;

        let arrivals = parse_document(&body)?;
        Ok(Snapshot::new(arrivals.up, arrivals.down, Utc::now()))
    }
}
