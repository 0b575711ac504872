//! Last-known-good snapshot storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::Snapshot;

use super::state::{RefreshFailure, RefreshStatus};

/// What a consumer sees when asking for the current data.
#[derive(Debug, Clone, PartialEq)]
pub enum Current {
    /// No refresh has succeeded yet.
    NoData,
    /// The latest successful snapshot.
    Ready(Arc<Snapshot>),
}

impl Current {
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            Current::NoData => None,
            Current::Ready(snapshot) => Some(snapshot),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Current::Ready(_))
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    snapshot: Option<Arc<Snapshot>>,
    status: RefreshStatus,
}

impl StoreInner {
    fn current(&self) -> Current {
        match &self.snapshot {
            Some(snapshot) => Current::Ready(Arc::clone(snapshot)),
            None => Current::NoData,
        }
    }
}

/// Thread-safe holder of the current snapshot and refresh health.
///
/// Cloning is cheap and every clone sees the same data. Writers only hold
/// the lock to swap the `Arc`, so readers never wait on network I/O.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl SnapshotStore {
    /// An empty store; `current` is `NoData` until the first `replace`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest successful snapshot, or `NoData` before the first success.
    pub async fn current(&self) -> Current {
        self.inner.read().await.current()
    }

    /// Current data and refresh health read under one lock, so the pair
    /// always describes the same moment.
    pub async fn load(&self) -> (Current, RefreshStatus) {
        let guard = self.inner.read().await;
        (guard.current(), guard.status.clone())
    }

    /// Health of the most recent refresh.
    pub async fn status(&self) -> RefreshStatus {
        self.inner.read().await.status.clone()
    }

    /// Whether any refresh has ever succeeded.
    pub async fn is_ready(&self) -> bool {
        self.inner.read().await.snapshot.is_some()
    }

    /// Publish a new snapshot and mark the refresh successful.
    pub async fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let at: DateTime<Utc> = snapshot.fetched_at;

        let mut guard = self.inner.write().await;
        guard.snapshot = Some(Arc::clone(&snapshot));
        guard.status.record_success(at);

        snapshot
    }

    /// Record a failed refresh. The current snapshot is left untouched.
    pub async fn record_failure(&self, failure: RefreshFailure) {
        let mut guard = self.inner.write().await;
        guard.status.record_failure(failure);
    }
}
