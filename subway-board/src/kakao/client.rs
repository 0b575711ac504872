//! Kakao place API HTTP client.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::debug;

use crate::domain::StationId;

use super::error::FetchError;
use super::source::ArrivalSource;

/// Default base URL for the mobile place endpoint.
const DEFAULT_BASE_URL: &str = "https://place.map.kakao.com/m/main/v";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How much of an error response body to keep in the error message.
const ERROR_BODY_CHARS: usize = 200;

/// Configuration for the Kakao client.
#[derive(Debug, Clone)]
pub struct KakaoConfig {
    /// Base URL; the station id is appended as the last path segment
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Optional User-Agent header
    pub user_agent: Option<String>,
}

impl KakaoConfig {
    /// Create a config pointing at the production endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Send a custom User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Kakao place API client.
#[derive(Debug, Clone)]
pub struct KakaoClient {
    http: reqwest::Client,
    base_url: String,
}

impl KakaoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: KakaoConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs));

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url,
        })
    }

    /// URL of the place document for a station.
    pub fn url_for(&self, station: &StationId) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            station.as_str()
        )
    }
}

impl ArrivalSource for KakaoClient {
    /// Fetch the raw place document.
    ///
    /// The endpoint does not reliably send a JSON content type, so the body
    /// is returned as text and parsed by the caller.
    async fn fetch(&self, station: &StationId) -> Result<String, FetchError> {
        let url = self.url_for(station);
        debug!(%url, "fetching place document");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "received place document");

        Ok(body)
    }
}
