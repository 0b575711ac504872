//! Fetch error types and their classification.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Errors from fetching and validating an arrival document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (connection, DNS, timeout inside the client)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure reported by a non-reqwest source
    #[error("transport error: {0}")]
    Transport(String),

    /// The fetch did not complete within the refresh deadline
    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body is not well-formed JSON
    #[error("JSON parse error: {message}")]
    Format {
        message: String,
        body: Option<String>,
    },

    /// Body parsed but lacks the expected structure
    #[error("unexpected response shape: {0}")]
    Schema(String),

    /// Anything else
    #[error("unexpected error: {0}")]
    Unclassified(String),
}

impl FetchError {
    /// Classify this error for health reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Http(_)
            | FetchError::Transport(_)
            | FetchError::Timeout(_)
            | FetchError::Status { .. } => FailureKind::Network,
            FetchError::Format { .. } => FailureKind::Format,
            FetchError::Schema(_) => FailureKind::Schema,
            FetchError::Unclassified(_) => FailureKind::Unclassified,
        }
    }
}

/// Failure taxonomy exposed to the host.
///
/// Every kind is recoverable: the next scheduled refresh retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport failure, timeout or non-2xx status.
    Network,
    /// Body could not be parsed as JSON.
    Format,
    /// JSON parsed but required fields are missing. Usually means the
    /// upstream API changed shape.
    Schema,
    Unclassified,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "NetworkError",
            FailureKind::Format => "FormatError",
            FailureKind::Schema => "SchemaError",
            FailureKind::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
