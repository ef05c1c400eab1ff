//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod session;

use clap::{Parser, Subcommand};

use bakehouse_core::config::AppConfig;
use bakehouse_core::error::AppError;
use bakehouse_database::DatabasePool;

use crate::output::OutputFormat;

/// Bakehouse administration: bootstrap admins and issue terminal sessions
#[derive(Debug, Parser)]
#[command(name = "bakehouse-admin", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load (config/{env}.toml)
    #[arg(short, long, env = "BAKEHOUSE_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Admin account management
    Admin(admin::AdminArgs),
    /// Auth session management
    Session(session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Admin(args) => admin::execute(args, &config, self.format).await,
            Commands::Session(args) => session::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: connect to the configured database
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
