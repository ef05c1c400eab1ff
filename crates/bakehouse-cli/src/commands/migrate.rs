//! Database migration command.

use bakehouse_core::config::AppConfig;
use bakehouse_core::error::AppError;

use crate::output;

/// Apply all pending migrations
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let db = super::create_db_pool(config).await?;
    bakehouse_database::migration::run_migrations(db.pool()).await?;
    db.close().await;

    output::print_success("Migrations applied");
    Ok(())
}
