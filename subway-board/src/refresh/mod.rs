//! Refresh core: the scheduled fetch-parse-validate cycle and the
//! last-known-good snapshot it publishes.
//!
//! One [`RefreshManager`] and its [`SnapshotStore`] exist per configured
//! station. The host drives `refresh()` from a timer and hands store clones
//! to anything that needs to read.

mod manager;
mod state;
mod store;

pub use manager::{RefreshConfig, RefreshManager, RefreshOutcome};
pub use state::{RefreshFailure, RefreshState, RefreshStatus};
pub use store::{Current, SnapshotStore};
