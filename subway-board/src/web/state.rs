//! Application state for the web layer.

use std::sync::Arc;

use crate::refresh::SnapshotStore;
use crate::sensor::StationSensor;

/// Shared application state.
///
/// Handlers only read; the refresh loop owns writing into the store.
#[derive(Clone)]
pub struct AppState {
    /// Last-known-good arrival data
    pub store: SnapshotStore,

    /// Sensor view over the same store
    pub sensor: Arc<StationSensor>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: SnapshotStore, sensor: StationSensor) -> Self {
        Self {
            store,
            sensor: Arc::new(sensor),
        }
    }
}
