//! Station identifier type.

use std::fmt;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// Opaque identifier of a station on the Kakao place map.
///
/// The value is interpolated into the request path, so it must be a single
/// non-empty path segment. Surrounding whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use subway_board::domain::StationId;
///
/// let id = StationId::parse(" 21160813 ").unwrap();
/// assert_eq!(id.as_str(), "21160813");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("1/2").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier from configuration input.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(InvalidStationId {
                reason: "must be a single path segment without whitespace",
            });
        }

        // URL normalization drops these (including `%2e` forms) from the path
        let dots = trimmed.to_ascii_lowercase().replace("%2e", ".");
        if matches!(dots.as_str(), "." | "..") {
            return Err(InvalidStationId {
                reason: "must not be a dot segment",
            });
        }

        Ok(StationId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for StationId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
