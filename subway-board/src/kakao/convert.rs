//! Validation and conversion of a raw place document into schedules.
//!
//! Checks run in order and stop at the first failure: well-formed JSON,
//! then presence of `basicInfo`, then `basicInfo.timeInfo`, then the
//! individual arrival entries.

use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::domain::{ArrivalEntry, DirectionalSchedule};

use super::error::FetchError;
use super::types::{TimeInfo, TimeInfoItem};

/// How much of an unparseable body to keep for diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

/// Both schedules extracted from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArrivals {
    pub up: DirectionalSchedule,
    pub down: DirectionalSchedule,
}

/// Parse and validate a response body.
pub fn parse_document(body: &str) -> Result<ParsedArrivals, FetchError> {
    let document: Value = serde_json::from_str(body).map_err(|e| FetchError::Format {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
    })?;

    let basic_info = document
        .get("basicInfo")
        .filter(|v| v.is_object())
        .ok_or_else(|| FetchError::Schema("missing basicInfo object".to_string()))?;

    let time_info = basic_info
        .get("timeInfo")
        .filter(|v| v.is_object())
        .ok_or_else(|| FetchError::Schema("missing basicInfo.timeInfo object".to_string()))?;

    let time_info = TimeInfo::deserialize(time_info)
        .map_err(|e| FetchError::Schema(format!("invalid timeInfo: {e}")))?;

    Ok(ParsedArrivals {
        up: convert_schedule(time_info.up_time_info, "upTimeInfo")?,
        down: convert_schedule(time_info.down_time_info, "downTimeInfo")?,
    })
}

/// Convert one direction's items. A missing list is an empty schedule.
///
/// Any bad entry rejects the whole document.
fn convert_schedule(items: Option<Vec<Value>>, field: &str) -> Result<DirectionalSchedule, FetchError> {
    items
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            convert_item(&raw).map_err(|reason| {
                error!(field, index = i, entry = %raw, %reason, "malformed arrival entry");
                FetchError::Schema(format!("{field}[{i}]: {reason}"))
            })
        })
        .collect()
}

fn convert_item(raw: &Value) -> Result<ArrivalEntry, String> {
    let item = TimeInfoItem::deserialize(raw).map_err(|e| e.to_string())?;

    let minutes = item
        .after_minute
        .as_f64()
        .ok_or_else(|| format!("afterMinute is not numeric: {:?}", item.after_minute))?;

    if !minutes.is_finite() || minutes < 0.0 {
        return Err(format!("afterMinute out of range: {minutes}"));
    }

    Ok(ArrivalEntry::new(item.end_station_name, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rank;
    use crate::kakao::FailureKind;

    #[test]
    fn parses_reference_document() {
        let body = r#"{"basicInfo":{"timeInfo":{"upTimeInfo":[{"endStationName":"Seoul","afterMinute":3}],"downTimeInfo":[]}}}"#;
        let parsed = parse_document(body).unwrap();

        assert_eq!(parsed.up.len(), 1);
        assert_eq!(parsed.up.next().unwrap().destination_name, "Seoul");
        assert_eq!(parsed.up.next().unwrap().minutes_until_arrival, 3.0);
        assert!(parsed.down.is_empty());
    }

    #[test]
    fn keeps_document_order() {
        let body = r#"{"basicInfo":{"timeInfo":{
            "downTimeInfo":[
                {"endStationName":"Incheon","afterMinute":0},
                {"endStationName":"Guro","afterMinute":4.5},
                {"endStationName":"Incheon","afterMinute":11}
            ]}}}"#;
        let parsed = parse_document(body).unwrap();

        let names: Vec<&str> = parsed
            .down
            .iter()
            .map(|e| e.destination_name.as_str())
            .collect();
        assert_eq!(names, vec!["Incheon", "Guro", "Incheon"]);
        assert_eq!(
            parsed.down.get(Rank::new(2).unwrap()).unwrap().minutes_until_arrival,
            4.5
        );
    }

    #[test]
    fn missing_directions_default_to_empty() {
        let parsed = parse_document(r#"{"basicInfo":{"timeInfo":{}}}"#).unwrap();
        assert!(parsed.up.is_empty());
        assert!(parsed.down.is_empty());

        let parsed =
            parse_document(r#"{"basicInfo":{"timeInfo":{"upTimeInfo":null}}}"#).unwrap();
        assert!(parsed.up.is_empty());
    }

    #[test]
    fn ignores_unrelated_fields() {
        let body = r#"{"isMapUser":"N","basicInfo":{"cid":1,"placenamefull":"Station",
            "timeInfo":{"upTimeInfo":[{"endStationName":"Seoul","afterMinute":3,"arrivalStatus":"x"}]}}}"#;
        let parsed = parse_document(body).unwrap();
        assert_eq!(parsed.up.len(), 1);
    }

    #[test]
    fn malformed_body_is_format_error() {
        let err = parse_document("<html>Service Unavailable</html>").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Format);

        let err = parse_document("").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Format);
    }

    #[test]
    fn missing_basic_info_is_schema_error() {
        let err = parse_document(r#"{"other":{}}"#).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Schema);
        assert!(err.to_string().contains("basicInfo"));

        let err = parse_document("[]").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Schema);
    }

    #[test]
    fn missing_time_info_is_schema_error() {
        let err = parse_document(r#"{"basicInfo":{}}"#).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Schema);
        assert!(err.to_string().contains("timeInfo"));

        let err = parse_document(r#"{"basicInfo":{"timeInfo":"none"}}"#).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Schema);
    }

    #[test]
    fn malformed_entries_are_schema_errors() {
        let missing_name = r#"{"basicInfo":{"timeInfo":{"upTimeInfo":[{"afterMinute":3}]}}}"#;
        assert_eq!(
            parse_document(missing_name).unwrap_err().kind(),
            FailureKind::Schema
        );

        let negative = r#"{"basicInfo":{"timeInfo":{"downTimeInfo":[{"endStationName":"A","afterMinute":-1}]}}}"#;
        let err = parse_document(negative).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Schema);
        assert!(err.to_string().contains("downTimeInfo[0]"));

        let text = r#"{"basicInfo":{"timeInfo":{"upTimeInfo":[{"endStationName":"A","afterMinute":"soon"}]}}}"#;
        assert_eq!(parse_document(text).unwrap_err().kind(), FailureKind::Schema);
    }

    #[test]
    fn bad_entry_is_reported_by_position() {
        let null_minute = r#"{"basicInfo":{"timeInfo":{"upTimeInfo":[
            {"endStationName":"Seoul","afterMinute":3},
            {"endStationName":"Incheon","afterMinute":null}]}}}"#;
        let err = parse_document(null_minute).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Schema);
        assert!(err.to_string().contains("upTimeInfo[1]"));

        let numeric_name = r#"{"basicInfo":{"timeInfo":{"downTimeInfo":[{"endStationName":7,"afterMinute":3}]}}}"#;
        let err = parse_document(numeric_name).unwrap_err();
        assert!(err.to_string().contains("downTimeInfo[0]"));
    }

    #[test]
    fn non_list_direction_is_schema_error() {
        let body = r#"{"basicInfo":{"timeInfo":{"upTimeInfo":"none"}}}"#;
        let err = parse_document(body).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Schema);
        assert!(err.to_string().contains("invalid timeInfo"));
    }

    #[test]
    fn numeric_string_minutes_accepted() {
        let body = r#"{"basicInfo":{"timeInfo":{"upTimeInfo":[{"endStationName":"A","afterMinute":" 12 "}]}}}"#;
        let parsed = parse_document(body).unwrap();
        assert_eq!(parsed.up.next().unwrap().minutes_until_arrival, 12.0);
    }

    #[test]
    fn format_error_keeps_body_excerpt() {
        let body = "x".repeat(2000);
        match parse_document(&body).unwrap_err() {
            FetchError::Format { body: Some(excerpt), .. } => {
                assert_eq!(excerpt.len(), BODY_EXCERPT_CHARS)
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }
}
