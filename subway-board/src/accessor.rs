//! Projection of a snapshot onto (direction, rank) display values.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::domain::{ArrivalEntry, Direction, Rank, Snapshot};
use crate::refresh::Current;

/// Text shown for a value that is not in the snapshot.
pub const UNAVAILABLE: &str = "unavailable";

/// A display value that may be missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<T> {
    Available(T),
    Unavailable,
}

impl<T> Field<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Field::Available(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Available(value) => Some(value),
            Field::Unavailable => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Available(value) => Field::Available(f(value)),
            Field::Unavailable => Field::Unavailable,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Available(value),
            None => Field::Unavailable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Available(value) => value.fmt(f),
            Field::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Serializes as the bare value, or the string `"unavailable"`.
impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Available(value) => value.serialize(serializer),
            Field::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

/// Read-only view answering "what is the Nth train in this direction".
///
/// Pure: no I/O, and out-of-range or missing data yields
/// [`Field::Unavailable`] rather than an error.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'a> {
    snapshot: Option<&'a Snapshot>,
}

impl<'a> FieldAccessor<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    /// Accessor over whatever the store currently holds. Every field is
    /// unavailable before the first successful refresh.
    pub fn from_current(current: &'a Current) -> Self {
        Self {
            snapshot: current.snapshot().map(|s| s.as_ref()),
        }
    }

    pub fn entry_at(&self, direction: Direction, rank: Rank) -> Field<&'a ArrivalEntry> {
        self.snapshot
            .and_then(|snapshot| snapshot.schedule(direction).get(rank))
            .into()
    }

    pub fn destination_at(&self, direction: Direction, rank: Rank) -> Field<&'a str> {
        self.entry_at(direction, rank)
            .map(|entry| entry.destination_name.as_str())
    }

    pub fn minutes_at(&self, direction: Direction, rank: Rank) -> Field<f64> {
        self.entry_at(direction, rank)
            .map(|entry| entry.minutes_until_arrival)
    }
}
