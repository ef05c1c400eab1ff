//! Auth session commands: issue terminal tokens and list who is online.

use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use bakehouse_auth::SessionIssuer;
use bakehouse_core::config::{AppConfig, MAX_ONLINE_WINDOW_MINUTES};
use bakehouse_core::error::AppError;
use bakehouse_core::types::UserId;
use bakehouse_database::repositories::{
    AuthSessionRepository, LivenessRepository, ProfileRepository,
};
use bakehouse_entity::session::OnlineUser;

use crate::output;
use crate::output::OutputFormat;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Issue a bearer token for a user, e.g. for a shop-floor terminal
    Issue {
        /// Profile id
        #[arg(short, long)]
        user: Uuid,
        /// Device label stored with the session
        #[arg(short, long)]
        device: Option<String>,
    },
    /// List users whose terminals sent a heartbeat recently
    Online {
        /// Look-back window in minutes (defaults to session.online_window_minutes)
        #[arg(short, long)]
        within_minutes: Option<u64>,
    },
}

/// An issued bearer token.
#[derive(Debug, Serialize, Tabled)]
pub struct IssuedRow {
    /// Auth session id
    pub session_id: Uuid,
    /// Bearer token; shown once
    pub token: String,
    /// Token expiry
    pub expires_at: String,
}

/// One line of the online listing.
#[derive(Debug, Serialize, Tabled)]
pub struct OnlineRow {
    /// Profile id
    pub user_id: Uuid,
    /// Display name
    pub display_name: String,
    /// Whether the account is enabled
    pub active: bool,
    /// Last heartbeat
    pub last_seen_at: String,
    /// Client that sent it
    pub user_agent: String,
}

impl From<OnlineUser> for OnlineRow {
    fn from(u: OnlineUser) -> Self {
        Self {
            user_id: u.user_id,
            display_name: u.display_name,
            active: u.active,
            last_seen_at: u.last_seen_at.to_rfc3339(),
            user_agent: u.user_agent.unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?.into_pool();

    match &args.command {
        SessionCommand::Issue { user, device } => {
            let profile = ProfileRepository::new(pool.clone())
                .find_by_id(*user)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User {user} not found")))?;
            if !profile.active {
                return Err(AppError::conflict(format!("User {user} is deactivated")));
            }

            let issuer = SessionIssuer::new(
                Arc::new(AuthSessionRepository::new(pool)),
                config.auth.clone(),
            );
            let issued = issuer
                .issue(UserId::from_uuid(profile.id), device.as_deref())
                .await?;

            output::print_item(
                &IssuedRow {
                    session_id: issued.session.id,
                    token: issued.token,
                    expires_at: issued.session.expires_at.to_rfc3339(),
                },
                format,
            );
            output::print_success(&format!(
                "Session issued for '{}'; set BAKEHOUSE_TERMINAL_TOKEN on the terminal",
                profile.display_name
            ));
        }
        SessionCommand::Online { within_minutes } => {
            let minutes = window_minutes(*within_minutes, config.session.online_window_minutes);
            let since = Utc::now() - Duration::minutes(i64::try_from(minutes).unwrap_or(0));
            let rows: Vec<OnlineRow> = LivenessRepository::new(pool)
                .find_seen_since(since)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

fn window_minutes(requested: Option<u64>, configured: u64) -> u64 {
    requested
        .unwrap_or(configured)
        .clamp(1, MAX_ONLINE_WINDOW_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_minutes() {
        assert_eq!(window_minutes(Some(5), 10), 5);
        assert_eq!(window_minutes(None, 10), 10);
        assert_eq!(window_minutes(Some(u64::MAX), 10), MAX_ONLINE_WINDOW_MINUTES);
        assert_eq!(window_minutes(Some(0), 10), 1);
    }

    #[test]
    fn test_online_row_fills_missing_agent() {
        let row = OnlineRow::from(OnlineUser {
            user_id: Uuid::new_v4(),
            display_name: "Counter".to_string(),
            active: true,
            last_seen_at: Utc::now(),
            user_agent: None,
        });
        assert_eq!(row.user_agent, "-");
        assert!(row.active);
    }
}
