//! Domain types for station arrival data.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod schedule;
mod snapshot;
mod station;

pub use schedule::{ArrivalEntry, Direction, DirectionalSchedule, InvalidDirection, InvalidRank, Rank};
pub use snapshot::Snapshot;
pub use station::{InvalidStationId, StationId};
