//! Dashboard configuration from environment variables.

use std::time::Duration;

/// Backend used when `ECO_GUARDIAN_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default period of the fetch-and-render timer.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Default period of the simulated drift timer.
pub const DEFAULT_DRIFT_INTERVAL: Duration = Duration::from_secs(15);

/// Environment variable holding the backend base URL.
pub const API_URL_VAR: &str = "ECO_GUARDIAN_API_URL";
/// Environment variable holding the refresh period in seconds.
pub const REFRESH_SECS_VAR: &str = "ECO_GUARDIAN_REFRESH_SECS";
/// Environment variable holding the drift period in seconds.
pub const DRIFT_SECS_VAR: &str = "ECO_GUARDIAN_DRIFT_SECS";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_SECS_VAR: &str = "ECO_GUARDIAN_TIMEOUT_SECS";

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A numeric setting was not a whole number of seconds.
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidNumber {
        /// Variable or flag name.
        var: String,
        /// Value as given.
        value: String,
    },

    /// A period was zero.
    #[error("{var} must be greater than zero")]
    Zero {
        /// Variable or flag name.
        var: String,
    },

    /// A port was not a number in `0..=65535`.
    #[error("{var} must be a port number, got {value:?}")]
    InvalidPort {
        /// Variable or flag name.
        var: String,
        /// Value as given.
        value: String,
    },
}

/// Settings for the dashboard core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Backend base URL, without the `/api/dashboard` suffix.
    pub base_url: String,
    /// How often to fetch and re-render.
    pub refresh_interval: Duration,
    /// How often to drift one simulated bin.
    pub drift_interval: Duration,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            drift_interval: DEFAULT_DRIFT_INTERVAL,
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    /// Reads the configuration from the process environment, falling
    /// back to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable is malformed or a
    /// period is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable is malformed or a
    /// period is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let refresh_interval = match lookup(REFRESH_SECS_VAR) {
            Some(value) => period(REFRESH_SECS_VAR, &value)?,
            None => defaults.refresh_interval,
        };

        let drift_interval = match lookup(DRIFT_SECS_VAR) {
            Some(value) => period(DRIFT_SECS_VAR, &value)?,
            None => defaults.drift_interval,
        };

        let request_timeout = lookup(TIMEOUT_SECS_VAR)
            .map(|value| period(TIMEOUT_SECS_VAR, &value))
            .transpose()?;

        Ok(Self {
            base_url,
            refresh_interval,
            drift_interval,
            request_timeout,
        })
    }
}

/// Parses a strictly positive number of seconds.
///
/// # Errors
///
/// Returns [`ConfigError`] if `value` is not a whole number or is zero.
pub fn period(var: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var: var.to_string(),
            value: value.to_string(),
        })?;

    if secs == 0 {
        return Err(ConfigError::Zero {
            var: var.to_string(),
        });
    }

    Ok(Duration::from_secs(secs))
}

/// Parses a TCP port.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPort`] if `value` is not in `0..=65535`.
pub fn port(var: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidPort {
        var: var.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.refresh_interval, Duration::from_secs(5));
        assert_eq!(config.drift_interval, Duration::from_secs(15));
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://bins.example.org"),
            (REFRESH_SECS_VAR, "10"),
            (DRIFT_SECS_VAR, " 30 "),
            (TIMEOUT_SECS_VAR, "3"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://bins.example.org");
        assert_eq!(config.refresh_interval, Duration::from_secs(10));
        assert_eq!(config.drift_interval, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn blank_url_falls_back_to_default() {
        let config = DashboardConfig::from_lookup(lookup(&[(API_URL_VAR, "  ")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_bad_periods() {
        assert_eq!(
            DashboardConfig::from_lookup(lookup(&[(REFRESH_SECS_VAR, "fast")])),
            Err(ConfigError::InvalidNumber {
                var: REFRESH_SECS_VAR.to_string(),
                value: "fast".to_string(),
            })
        );
        assert_eq!(
            DashboardConfig::from_lookup(lookup(&[(DRIFT_SECS_VAR, "0")])),
            Err(ConfigError::Zero {
                var: DRIFT_SECS_VAR.to_string(),
            })
        );
    }

    #[test]
    fn parses_ports() {
        assert_eq!(port("PORT", " 9090 "), Ok(9090));
        assert_eq!(
            port("PORT", "80800"),
            Err(ConfigError::InvalidPort {
                var: "PORT".to_string(),
                value: "80800".to_string(),
            })
        );
    }
}
