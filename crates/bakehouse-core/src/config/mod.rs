//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::session::{
    MAX_INACTIVITY_TIMEOUT_MINUTES, MAX_INTERVAL_SECONDS, MAX_ONLINE_WINDOW_MINUTES, SessionConfig,
};

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay + `BAKEHOUSE__*` variables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session liveness and guard settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with the `config/{env}.toml` overlay
    /// and environment variables prefixed with `BAKEHOUSE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BAKEHOUSE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::from_config(config)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::from_config(config)
    }

    fn from_config(config: config::Config) -> Result<Self, AppError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.session.validate()?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            url = "postgres://bakehouse@localhost/bakehouse"
            "#,
        )
        .expect("should parse");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.inactivity_timeout_minutes, 30);
        assert_eq!(config.session.activity_throttle_seconds, 5);
        assert_eq!(config.session.account_poll_interval_seconds, 60);
        assert_eq!(config.session.heartbeat_interval_seconds, 300);
        assert_eq!(config.auth.session_ttl_hours, 12);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_session_overrides() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            url = "postgres://localhost/bakehouse"

            [session]
            inactivity_timeout_minutes = 10
            account_poll_interval_seconds = 15
            "#,
        )
        .expect("should parse");

        assert_eq!(config.session.inactivity_timeout_minutes, 10);
        assert_eq!(config.session.account_poll_interval_seconds, 15);
        assert_eq!(config.session.heartbeat_interval_seconds, 300);
    }

    #[test]
    fn test_shipped_default_file_parses() {
        let config = AppConfig::from_toml(include_str!("../../../../config/default.toml"))
            .expect("config/default.toml should parse");
        assert_eq!(config.server.cors.allowed_methods.len(), 4);
        assert_eq!(config.session.online_window_minutes, 10);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_zero_heartbeat_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [database]
            url = "postgres://localhost/bakehouse"

            [session]
            heartbeat_interval_seconds = 0
            "#,
        )
        .unwrap_err();

        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
