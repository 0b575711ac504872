//! Station sensor: the value/attributes view a host renders.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::accessor::{Field, FieldAccessor, UNAVAILABLE};
use crate::domain::{Direction, Rank, StationId};
use crate::refresh::{Current, RefreshStatus, SnapshotStore};

/// Display name used when none is configured.
pub const DEFAULT_NAME: &str = "Seoul Subway";

/// Ranks exposed per direction when none is configured.
pub const DEFAULT_RANKS: usize = 2;

/// Headline state of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorValue {
    /// Latest refresh succeeded.
    #[serde(rename = "OK")]
    Ok,
    /// Latest refresh failed; attributes still show the previous data.
    #[serde(rename = "Error")]
    Error,
    /// No refresh has ever succeeded.
    #[serde(rename = "unavailable")]
    Unavailable,
}

/// Everything a host needs to render the sensor at one moment.
#[derive(Debug, Clone, Serialize)]
pub struct SensorReading {
    pub name: String,
    pub value: SensorValue,
    pub attributes: BTreeMap<String, Value>,
}

/// Sensor for one station, backed by that station's store.
#[derive(Debug, Clone)]
pub struct StationSensor {
    name: String,
    station: StationId,
    ranks: usize,
    store: SnapshotStore,
}

impl StationSensor {
    pub fn new(name: impl Into<String>, station: StationId, store: SnapshotStore) -> Self {
        Self {
            name: name.into(),
            station,
            ranks: DEFAULT_RANKS,
            store,
        }
    }

    /// Set how many upcoming trains per direction appear in the attributes.
    pub fn with_ranks(mut self, ranks: usize) -> Self {
        self.ranks = ranks;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Headline value from the latest refresh.
    pub async fn value(&self) -> SensorValue {
        let (current, status) = self.store.load().await;
        sensor_value(&current, &status)
    }

    /// Attribute map, e.g. `upbound_1_destination` / `upbound_1_time_left`.
    pub async fn attributes(&self) -> BTreeMap<String, Value> {
        self.attributes_of(&self.store.current().await)
    }

    /// Value and attributes taken from the same store state.
    pub async fn read(&self) -> SensorReading {
        let (current, status) = self.store.load().await;
        SensorReading {
            name: self.name.clone(),
            value: sensor_value(&current, &status),
            attributes: self.attributes_of(&current),
        }
    }

    fn attributes_of(&self, current: &Current) -> BTreeMap<String, Value> {
        let fields = FieldAccessor::from_current(current);
        let mut attributes = BTreeMap::new();

        for direction in Direction::ALL {
            for rank in Rank::up_to(self.ranks) {
                let prefix = format!("{}_{}", direction.bound_label(), rank);
                attributes.insert(
                    format!("{prefix}_destination"),
                    field_value(fields.destination_at(direction, rank)),
                );
                attributes.insert(
                    format!("{prefix}_time_left"),
                    field_value(fields.minutes_at(direction, rank)),
                );
            }
        }

        attributes.insert(
            "station_id".to_string(),
            Value::String(self.station.to_string()),
        );
        attributes.insert(
            "fetched_at".to_string(),
            current
                .snapshot()
                .map(|s| Value::String(s.fetched_at.to_rfc3339()))
                .unwrap_or(Value::Null),
        );

        attributes
    }
}

fn sensor_value(current: &Current, status: &RefreshStatus) -> SensorValue {
    if !current.is_ready() {
        SensorValue::Unavailable
    } else if status.last_update_success {
        SensorValue::Ok
    } else {
        SensorValue::Error
    }
}

fn field_value<T: Serialize>(field: Field<T>) -> Value {
    serde_json::to_value(&field).unwrap_or_else(|_| Value::String(UNAVAILABLE.to_string()))
}
