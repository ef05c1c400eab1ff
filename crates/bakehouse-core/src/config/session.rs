//! Session liveness and guard configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted inactivity timeout (one day).
pub const MAX_INACTIVITY_TIMEOUT_MINUTES: u64 = 24 * 60;

/// Longest accepted poll or heartbeat interval (one day).
pub const MAX_INTERVAL_SECONDS: u64 = 24 * 60 * 60;

/// Longest look-back for the admin "online" view.
pub const MAX_ONLINE_WINDOW_MINUTES: u64 = 24 * 60;

/// Timings for the client session guard and the online-users view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle period in minutes after which the guard signs the user out.
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_minutes: u64,
    /// Window in seconds during which repeated activity does not rearm
    /// the inactivity deadline.
    #[serde(default = "default_activity_throttle")]
    pub activity_throttle_seconds: u64,
    /// Interval in seconds between account-active checks.
    #[serde(default = "default_account_poll_interval")]
    pub account_poll_interval_seconds: u64,
    /// Interval in seconds between liveness heartbeats.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Default look-back in minutes for the admin "online" view.
    #[serde(default = "default_online_window")]
    pub online_window_minutes: u64,
    /// Client identifier written with each heartbeat. Hosts fall back to
    /// their own user agent when unset.
    #[serde(default)]
    pub client_info: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_minutes: default_inactivity_timeout(),
            activity_throttle_seconds: default_activity_throttle(),
            account_poll_interval_seconds: default_account_poll_interval(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            online_window_minutes: default_online_window(),
            client_info: None,
        }
    }
}

impl SessionConfig {
    /// Inactivity timeout as a [`Duration`]. Saturates instead of
    /// overflowing on out-of-range values.
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_minutes.saturating_mul(60))
    }

    /// Reject timings the guard cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        check_range(
            "session.inactivity_timeout_minutes",
            self.inactivity_timeout_minutes,
            MAX_INACTIVITY_TIMEOUT_MINUTES,
        )?;
        check_range(
            "session.account_poll_interval_seconds",
            self.account_poll_interval_seconds,
            MAX_INTERVAL_SECONDS,
        )?;
        check_range(
            "session.heartbeat_interval_seconds",
            self.heartbeat_interval_seconds,
            MAX_INTERVAL_SECONDS,
        )?;
        check_range(
            "session.online_window_minutes",
            self.online_window_minutes,
            MAX_ONLINE_WINDOW_MINUTES,
        )?;

        let timeout_seconds = self
            .inactivity_timeout_minutes
            .checked_mul(60)
            .ok_or_else(|| {
                AppError::configuration("session.inactivity_timeout_minutes is out of range")
            })?;
        if self.activity_throttle_seconds >= timeout_seconds {
            return Err(AppError::configuration(
                "session.activity_throttle_seconds must be shorter than the inactivity timeout",
            ));
        }
        Ok(())
    }
}

fn check_range(key: &str, value: u64, max: u64) -> Result<(), AppError> {
    if value == 0 || value > max {
        return Err(AppError::configuration(format!(
            "{key} must be between 1 and {max}, got {value}"
        )));
    }
    Ok(())
}

fn default_inactivity_timeout() -> u64 {
    30
}

fn default_activity_throttle() -> u64 {
    5
}

fn default_account_poll_interval() -> u64 {
    60
}

fn default_heartbeat_interval() -> u64 {
    300
}

fn default_online_window() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_throttle_longer_than_timeout_rejected() {
        let config = SessionConfig {
            inactivity_timeout_minutes: 1,
            activity_throttle_seconds: 60,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let cases = [
            SessionConfig {
                inactivity_timeout_minutes: u64::MAX,
                ..SessionConfig::default()
            },
            SessionConfig {
                account_poll_interval_seconds: MAX_INTERVAL_SECONDS + 1,
                ..SessionConfig::default()
            },
            SessionConfig {
                heartbeat_interval_seconds: u64::MAX,
                ..SessionConfig::default()
            },
            SessionConfig {
                online_window_minutes: MAX_ONLINE_WINDOW_MINUTES + 1,
                ..SessionConfig::default()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_upper_bounds_accepted() {
        let config = SessionConfig {
            inactivity_timeout_minutes: MAX_INACTIVITY_TIMEOUT_MINUTES,
            account_poll_interval_seconds: MAX_INTERVAL_SECONDS,
            heartbeat_interval_seconds: MAX_INTERVAL_SECONDS,
            online_window_minutes: MAX_ONLINE_WINDOW_MINUTES,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inactivity_timeout_saturates() {
        let config = SessionConfig {
            inactivity_timeout_minutes: u64::MAX,
            ..SessionConfig::default()
        };
        assert_eq!(config.inactivity_timeout(), Duration::from_secs(u64::MAX));
        assert_eq!(
            SessionConfig::default().inactivity_timeout(),
            Duration::from_secs(30 * 60)
        );
    }
}
