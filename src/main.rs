//! Bakehouse Server
//!
//! Serves the session liveness API used by shop-floor terminals and the
//! back office.

use bakehouse::{init_logging, load_configuration};
use bakehouse_core::config::AppConfig;
use bakehouse_core::error::AppError;
use bakehouse_database::DatabasePool;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Bakehouse");

    let db = DatabasePool::connect(&config.database).await?;

    bakehouse_database::migration::run_migrations(db.pool()).await?;

    bakehouse_api::run_server(config, db.into_pool()).await?;

    tracing::info!("Bakehouse server shut down gracefully");
    Ok(())
}
