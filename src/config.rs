//! Runtime configuration read from the environment.

use std::{env, time::Duration};

use thiserror::Error;
use url::Url;

pub const BASE_URL_VAR: &str = "ECOKISAN_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "ECOKISAN_HTTP_TIMEOUT_SECS";
pub const TIMEZONE_VAR: &str = "ECOKISAN_WEATHER_TIMEZONE";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Root of the EcoKisan backend with a trailing slash; `market/` and
    /// `auth/` hang off it.
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub weather_timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            weather_timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BASE_URL_VAR).filter(|value| !value.trim().is_empty()) {
            config.api_base_url = parse_base_url(raw.trim())?;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|value| !value.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(TIMEZONE_VAR).filter(|value| !value.trim().is_empty()) {
            config.weather_timezone = raw.trim().to_string();
        }

        Ok(config)
    }
}

/// Validates a base URL, forcing a trailing slash so relative joins append
/// instead of replacing the last segment.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map(String::from)
        .map_err(|source| ConfigError::InvalidUrl {
            var: BASE_URL_VAR,
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "http://127.0.0.1:5000/");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let config =
            AppConfig::from_lookup(lookup(&[(BASE_URL_VAR, "https://api.example.org/v1")])).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.org/v1/");
        let base = Url::parse(&config.api_base_url).unwrap();
        assert_eq!(
            base.join("market/prices").unwrap().as_str(),
            "https://api.example.org/v1/market/prices"
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(BASE_URL_VAR, "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "0")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn overrides_timeout_and_timezone() {
        let config = AppConfig::from_lookup(lookup(&[
            (TIMEOUT_VAR, " 30 "),
            (TIMEZONE_VAR, "UTC"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.weather_timezone, "UTC");
    }
}
