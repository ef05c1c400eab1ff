//! Runtime timings for the guard components.

use std::time::Duration;

use bakehouse_core::config::SessionConfig;

/// Default client identifier sent with heartbeats.
pub const DEFAULT_CLIENT_INFO: &str = concat!("bakehouse-guard/", env!("CARGO_PKG_VERSION"));

/// Account-check interval used when a zero interval is supplied.
pub const DEFAULT_ACCOUNT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Heartbeat interval used when a zero interval is supplied.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Timings used by a [`SessionGuard`](crate::SessionGuard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Idle period before an inactivity logout.
    pub inactivity_timeout: Duration,
    /// Minimum spacing between accepted activity events.
    pub activity_throttle: Duration,
    /// Interval between account-active checks.
    pub account_poll_interval: Duration,
    /// Interval between liveness heartbeats.
    pub heartbeat_interval: Duration,
    /// Client identifier written with each heartbeat.
    pub client_info: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for GuardConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            inactivity_timeout: config.inactivity_timeout(),
            activity_throttle: Duration::from_secs(config.activity_throttle_seconds),
            account_poll_interval: Duration::from_secs(config.account_poll_interval_seconds),
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_seconds),
            client_info: config
                .client_info
                .clone()
                .unwrap_or_else(|| DEFAULT_CLIENT_INFO.to_string()),
        }
    }
}
