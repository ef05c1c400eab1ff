//! Admin account bootstrap.
//!
//! Every back-office route requires an admin bearer token, so the first
//! admin and their token have to come from here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use bakehouse_auth::SessionIssuer;
use bakehouse_core::config::AppConfig;
use bakehouse_core::error::AppError;
use bakehouse_core::types::UserId;
use bakehouse_database::repositories::{AuthSessionRepository, ProfileRepository};
use bakehouse_entity::profile::{CreateProfile, UserRole};

use crate::output;
use crate::output::OutputFormat;

/// Longest accepted display name, matching the API's create-user rule.
const MAX_DISPLAY_NAME_CHARS: usize = 100;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create an admin profile and issue its first bearer token
    Create {
        /// Display name (will prompt if not provided)
        #[arg(short = 'n', long)]
        display_name: Option<String>,
        /// Device label stored with the issued session
        #[arg(short, long, default_value = "bakehouse-admin")]
        device: String,
    },
}

/// A freshly created admin and their bearer token.
#[derive(Debug, Serialize, Tabled)]
pub struct CreatedAdmin {
    /// Profile id
    pub id: Uuid,
    /// Display name
    pub display_name: String,
    /// Bearer token; shown once
    pub token: String,
    /// Token expiry
    pub expires_at: DateTime<Utc>,
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AdminCommand::Create {
            display_name,
            device,
        } => {
            let display_name = match display_name {
                Some(n) => n.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin display name")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };
            let display_name = validate_display_name(&display_name)?;

            let pool = super::create_db_pool(config).await?.into_pool();
            let profiles = ProfileRepository::new(pool.clone());
            let issuer = SessionIssuer::new(
                Arc::new(AuthSessionRepository::new(pool)),
                config.auth.clone(),
            );

            let created = create_admin(&profiles, &issuer, display_name, device).await?;
            output::print_item(&created, format);
            output::print_success(&format!(
                "Admin '{}' created (id: {})",
                created.display_name, created.id
            ));
        }
    }

    Ok(())
}

/// Insert an admin profile and issue a session for it.
pub async fn create_admin(
    profiles: &ProfileRepository,
    issuer: &SessionIssuer,
    display_name: String,
    device: &str,
) -> Result<CreatedAdmin, AppError> {
    let profile = profiles
        .create(&CreateProfile {
            id: None,
            display_name,
            role: UserRole::Admin,
        })
        .await?;

    let issued = issuer
        .issue(UserId::from_uuid(profile.id), Some(device))
        .await?;
    tracing::info!(user_id = %profile.id, "Admin bootstrapped from CLI");

    Ok(CreatedAdmin {
        id: profile.id,
        display_name: profile.display_name,
        token: issued.token,
        expires_at: issued.session.expires_at,
    })
}

fn validate_display_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(AppError::validation(format!(
            "Display name must be 1..={MAX_DISPLAY_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use bakehouse_auth::SessionResolver;
    use bakehouse_core::config::DatabaseConfig;
    use bakehouse_core::error::ErrorKind;
    use bakehouse_database::DatabasePool;

    use super::*;

    #[test]
    fn test_display_name_is_trimmed() {
        assert_eq!(validate_display_name("  Head baker ").unwrap(), "Head baker");
    }

    #[test]
    fn test_display_name_bounds() {
        let long = "x".repeat(MAX_DISPLAY_NAME_CHARS + 1);
        for bad in ["", "   ", long.as_str()] {
            let err = validate_display_name(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
        assert!(validate_display_name(&"x".repeat(MAX_DISPLAY_NAME_CHARS)).is_ok());
    }

    #[tokio::test]
    async fn test_bootstrapped_admin_token_resolves_as_admin() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let config = DatabaseConfig {
            url,
            max_connections: 2,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 60,
        };
        let db = DatabasePool::connect(&config).await.unwrap();
        bakehouse_database::migration::run_migrations(db.pool())
            .await
            .unwrap();
        let pool = db.into_pool();

        let profiles = Arc::new(ProfileRepository::new(pool.clone()));
        let sessions = Arc::new(AuthSessionRepository::new(pool));
        let issuer = SessionIssuer::new(Arc::clone(&sessions), Default::default());

        let created = create_admin(&profiles, &issuer, "Owner".to_string(), "laptop")
            .await
            .unwrap();

        let user = SessionResolver::new(sessions, profiles)
            .resolve(&created.token)
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.user_id.into_uuid(), created.id);
    }
}
