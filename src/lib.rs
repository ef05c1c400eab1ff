//! Bakehouse binaries' shared startup: configuration loading and logging.

use tracing_subscriber::{EnvFilter, fmt};

use bakehouse_core::config::{AppConfig, LoggingConfig};
use bakehouse_core::error::AppError;

/// Environment variable selecting the config overlay (`config/{env}.toml`).
pub const ENV_VAR: &str = "BAKEHOUSE_ENV";

/// Load configuration for the environment named by `BAKEHOUSE_ENV`
/// (default `development`).
pub fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
