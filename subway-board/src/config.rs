//! Runtime configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::{InvalidStationId, StationId};
use crate::refresh::RefreshConfig;
use crate::sensor::{DEFAULT_NAME, DEFAULT_RANKS};

pub const ENV_STATION_ID: &str = "SUBWAY_STATION_ID";
pub const ENV_STATION_NAME: &str = "SUBWAY_STATION_NAME";
pub const ENV_POLL_INTERVAL_SECS: &str = "SUBWAY_POLL_INTERVAL_SECS";
pub const ENV_MIN_INTERVAL_SECS: &str = "SUBWAY_MIN_INTERVAL_SECS";
pub const ENV_TIMEOUT_SECS: &str = "SUBWAY_TIMEOUT_SECS";
pub const ENV_SETUP_RETRY_SECS: &str = "SUBWAY_SETUP_RETRY_SECS";
pub const ENV_RANKS: &str = "SUBWAY_RANKS";
pub const ENV_BIND_ADDR: &str = "SUBWAY_BIND_ADDR";
pub const ENV_BASE_URL: &str = "SUBWAY_BASE_URL";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_MIN_INTERVAL_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SETUP_RETRY_SECS: u64 = 30;
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Upper bound for every interval setting: one day.
const MAX_INTERVAL_SECS: u64 = 86_400;

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key}: {source}")]
    Station {
        key: &'static str,
        source: InvalidStationId,
    },

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Host configuration for one station.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub station_id: StationId,
    /// Display name of the sensor
    pub station_name: String,
    /// Period of the background refresh
    pub poll_interval: Duration,
    /// Refreshes closer together than this are skipped
    pub min_interval: Duration,
    /// Upper bound on a single fetch
    pub fetch_timeout: Duration,
    /// Delay between attempts while the first refresh keeps failing
    pub setup_retry: Duration,
    /// Upcoming trains per direction shown by the sensor
    pub ranks: usize,
    pub bind_addr: SocketAddr,
    /// Override of the Kakao endpoint (for testing)
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_station = get(ENV_STATION_ID).ok_or(ConfigError::Missing(ENV_STATION_ID))?;
        let station_id = StationId::parse(&raw_station).map_err(|source| ConfigError::Station {
            key: ENV_STATION_ID,
            source,
        })?;

        let station_name = get(ENV_STATION_NAME)
            .map(|name| name.trim().to_string())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let poll_interval = seconds(
            get(ENV_POLL_INTERVAL_SECS),
            ENV_POLL_INTERVAL_SECS,
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        let min_interval_secs: u64 = parse_or(
            get(ENV_MIN_INTERVAL_SECS),
            ENV_MIN_INTERVAL_SECS,
            DEFAULT_MIN_INTERVAL_SECS,
        )?;
        if min_interval_secs > MAX_INTERVAL_SECS {
            return Err(invalid(
                ENV_MIN_INTERVAL_SECS,
                &min_interval_secs.to_string(),
                &format!("must be at most {MAX_INTERVAL_SECS}"),
            ));
        }
        let min_interval = Duration::from_secs(min_interval_secs);
        let fetch_timeout = seconds(get(ENV_TIMEOUT_SECS), ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?;
        let setup_retry = seconds(
            get(ENV_SETUP_RETRY_SECS),
            ENV_SETUP_RETRY_SECS,
            DEFAULT_SETUP_RETRY_SECS,
        )?;

        // A shorter period would mostly hit the throttle instead of fetching
        not_below_min(poll_interval, min_interval, ENV_POLL_INTERVAL_SECS)?;
        not_below_min(setup_retry, min_interval, ENV_SETUP_RETRY_SECS)?;

        let ranks: usize = parse_or(get(ENV_RANKS), ENV_RANKS, DEFAULT_RANKS)?;
        if ranks == 0 {
            return Err(invalid(ENV_RANKS, "0", "must be at least 1"));
        }

        let bind_addr: SocketAddr = parse_or(
            get(ENV_BIND_ADDR),
            ENV_BIND_ADDR,
            SocketAddr::from(DEFAULT_BIND_ADDR),
        )?;

        Ok(Self {
            station_id,
            station_name,
            poll_interval,
            min_interval,
            fetch_timeout,
            setup_retry,
            ranks,
            bind_addr,
            base_url: get(ENV_BASE_URL).map(|url| url.trim().to_string()),
        })
    }

    /// Timing for the refresh manager.
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            min_interval: self.min_interval,
            fetch_timeout: self.fetch_timeout,
        }
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &raw, &e.to_string())),
        None => Ok(default),
    }
}

/// A positive number of seconds, at most [`MAX_INTERVAL_SECS`].
fn seconds(raw: Option<String>, key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(raw, key, default)?;
    if secs == 0 {
        return Err(invalid(key, "0", "must be greater than zero"));
    }
    if secs > MAX_INTERVAL_SECS {
        return Err(invalid(
            key,
            &secs.to_string(),
            &format!("must be at most {MAX_INTERVAL_SECS}"),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn not_below_min(
    period: Duration,
    min_interval: Duration,
    key: &'static str,
) -> Result<(), ConfigError> {
    if period < min_interval {
        return Err(invalid(
            key,
            &period.as_secs().to_string(),
            &format!("must not be shorter than {ENV_MIN_INTERVAL_SECS} ({}s)", min_interval.as_secs()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_STATION_ID, "21160813")])).unwrap();

        assert_eq!(config.station_id.as_str(), "21160813");
        assert_eq!(config.station_name, "Seoul Subway");
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.min_interval, Duration::from_secs(30));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.setup_retry, Duration::from_secs(30));
        assert_eq!(config.ranks, 2);
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn custom_values() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, " 21160813 "),
            (ENV_STATION_NAME, "Hoegi"),
            (ENV_POLL_INTERVAL_SECS, "30"),
            (ENV_MIN_INTERVAL_SECS, "0"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_RANKS, "3"),
            (ENV_BIND_ADDR, "0.0.0.0:8080"),
            (ENV_BASE_URL, "http://localhost:9000/v"),
        ]))
        .unwrap();

        assert_eq!(config.station_id.as_str(), "21160813");
        assert_eq!(config.station_name, "Hoegi");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.min_interval, Duration::ZERO);
        assert_eq!(config.ranks, 3);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/v"));

        let refresh = config.refresh_config();
        assert_eq!(refresh.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_station_id() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_STATION_ID)));
        assert_eq!(err.to_string(), "SUBWAY_STATION_ID is not set");

        let err = AppConfig::from_lookup(lookup(&[(ENV_STATION_ID, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn invalid_station_id() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_STATION_ID, "a/b")])).unwrap_err();
        assert!(matches!(err, ConfigError::Station { .. }));
    }

    #[test]
    fn invalid_numbers() {
        let err = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_POLL_INTERVAL_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().starts_with("SUBWAY_POLL_INTERVAL_SECS=\"soon\" is invalid"));

        let err = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_TIMEOUT_SECS, .. }));

        let err = AppConfig::from_lookup(lookup(&[(ENV_STATION_ID, "1"), (ENV_RANKS, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_RANKS, .. }));
    }

    #[test]
    fn intervals_are_bounded() {
        let max = u64::MAX.to_string();
        let err = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_MIN_INTERVAL_SECS, max.as_str()),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_MIN_INTERVAL_SECS, .. }));

        let err = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_POLL_INTERVAL_SECS, "86401"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_POLL_INTERVAL_SECS, .. }));

        let config = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_POLL_INTERVAL_SECS, "86400"),
            (ENV_MIN_INTERVAL_SECS, "86400"),
            (ENV_SETUP_RETRY_SECS, "86400"),
        ]))
        .unwrap();
        assert_eq!(config.min_interval, Duration::from_secs(86_400));
    }

    #[test]
    fn periods_shorter_than_throttle_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_SETUP_RETRY_SECS, "5"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_SETUP_RETRY_SECS, .. }));
        assert!(err.to_string().contains("SUBWAY_MIN_INTERVAL_SECS"));

        let err = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_POLL_INTERVAL_SECS, "20"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_POLL_INTERVAL_SECS, .. }));

        let config = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_POLL_INTERVAL_SECS, "5"),
            (ENV_SETUP_RETRY_SECS, "5"),
            (ENV_MIN_INTERVAL_SECS, "5"),
        ]))
        .unwrap();
        assert_eq!(config.setup_retry, config.min_interval);
    }

    #[test]
    fn invalid_bind_addr() {
        let err = AppConfig::from_lookup(lookup(&[
            (ENV_STATION_ID, "1"),
            (ENV_BIND_ADDR, "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_BIND_ADDR, .. }));
    }
}
