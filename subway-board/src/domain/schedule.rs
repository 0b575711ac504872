//! Arrival schedules for the two travel directions of a station.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::Serialize;

/// Travel direction on a bidirectional line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Both directions, upbound first.
    pub const ALL: [Direction; 2] = [Direction::Up, Direction::Down];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Long label used in sensor attribute names ("upbound" / "downbound").
    pub fn bound_label(&self) -> &'static str {
        match self {
            Direction::Up => "upbound",
            Direction::Down => "downbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction {0:?}: expected up, upbound, down or downbound")]
pub struct InvalidDirection(pub String);

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "upbound" => Ok(Direction::Up),
            "down" | "downbound" => Ok(Direction::Down),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }
}

/// Error returned for a zero rank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rank must be at least 1")]
pub struct InvalidRank;

/// 1-indexed position in a schedule: rank 1 is the soonest arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rank(NonZeroUsize);

impl Rank {
    pub const FIRST: Rank = Rank(NonZeroUsize::MIN);

    pub fn new(rank: usize) -> Result<Self, InvalidRank> {
        NonZeroUsize::new(rank).map(Rank).ok_or(InvalidRank)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    /// Zero-based index into a schedule.
    pub fn index(&self) -> usize {
        self.0.get() - 1
    }

    /// Ranks `1..=count`.
    pub fn up_to(count: usize) -> impl Iterator<Item = Rank> {
        (1..=count).filter_map(|r| Rank::new(r).ok())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One scheduled arrival.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalEntry {
    /// Terminus the train is heading to.
    pub destination_name: String,
    /// Minutes until the train arrives. Never negative.
    pub minutes_until_arrival: f64,
}

impl ArrivalEntry {
    pub fn new(destination_name: impl Into<String>, minutes_until_arrival: f64) -> Self {
        Self {
            destination_name: destination_name.into(),
            minutes_until_arrival,
        }
    }
}

/// Ordered arrivals for one direction, soonest first.
///
/// An empty schedule is valid: the station may be a terminus or closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DirectionalSchedule(Vec<ArrivalEntry>);

impl DirectionalSchedule {
    pub fn new(entries: Vec<ArrivalEntry>) -> Self {
        Self(entries)
    }

    pub fn get(&self, rank: Rank) -> Option<&ArrivalEntry> {
        self.0.get(rank.index())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArrivalEntry> {
        self.0.iter()
    }

    /// The soonest arrival, if any.
    pub fn next(&self) -> Option<&ArrivalEntry> {
        self.0.first()
    }
}

impl FromIterator<ArrivalEntry> for DirectionalSchedule {
    fn from_iter<I: IntoIterator<Item = ArrivalEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DirectionalSchedule {
    type Item = &'a ArrivalEntry;
    type IntoIter = std::slice::Iter<'a, ArrivalEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
