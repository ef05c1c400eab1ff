//! Schema migrations for profiles, auth sessions and liveness rows.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use bakehouse_core::error::{AppError, ErrorKind};

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every pending migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(embedded = MIGRATOR.iter().count(), "Applying schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to apply schema migrations", e)
    })?;

    info!("Schema is up to date");
    Ok(())
}
