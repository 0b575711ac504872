//! Kakao place API response DTOs.
//!
//! Only the `basicInfo.timeInfo` branch of the place document is modelled.
//! The surrounding objects are located by key during validation so that a
//! missing branch can be reported as a schema problem rather than a parse
//! failure.

use serde::Deserialize;
use serde_json::Value;

/// The `basicInfo.timeInfo` object.
///
/// Entries stay raw here and are decoded one by one into [`TimeInfoItem`],
/// so a bad entry can be reported with its position and content.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfo {
    /// Upbound arrivals, soonest first. Absent or null means none.
    #[serde(default)]
    pub up_time_info: Option<Vec<Value>>,

    /// Downbound arrivals, soonest first. Absent or null means none.
    #[serde(default)]
    pub down_time_info: Option<Vec<Value>>,
}

/// One upcoming train.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfoItem {
    /// Terminus of the train.
    pub end_station_name: String,

    /// Minutes until arrival.
    pub after_minute: AfterMinute,
}

/// `afterMinute` is normally a JSON number; numeric strings are tolerated.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AfterMinute {
    Number(f64),
    Text(String),
}

impl AfterMinute {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AfterMinute::Number(n) => Some(*n),
            AfterMinute::Text(s) => s.trim().parse().ok(),
        }
    }
}
