//! Issues new auth sessions.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use bakehouse_core::config::AuthConfig;
use bakehouse_core::result::AppResult;
use bakehouse_core::types::UserId;
use bakehouse_database::repositories::AuthSessionRepository;
use bakehouse_entity::session::{AuthSession, CreateAuthSession};

use crate::token::{generate_token, hash_token};

/// A freshly issued session together with its raw bearer token.
///
/// The raw token is never stored; only its hash is persisted.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Raw bearer token to hand to the client.
    pub token: String,
    /// The persisted session row.
    pub session: AuthSession,
}

/// Creates auth sessions with the configured lifetime.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    sessions: Arc<AuthSessionRepository>,
    config: AuthConfig,
}

impl SessionIssuer {
    /// Creates a new session issuer.
    pub fn new(sessions: Arc<AuthSessionRepository>, config: AuthConfig) -> Self {
        Self { sessions, config }
    }

    /// Issue a session for `user_id`.
    pub async fn issue(
        &self,
        user_id: UserId,
        user_agent: Option<&str>,
    ) -> AppResult<IssuedSession> {
        let token = generate_token();
        let data = CreateAuthSession {
            user_id: user_id.into_uuid(),
            token_hash: hash_token(&token),
            user_agent: user_agent.map(String::from),
            expires_at: Utc::now() + Duration::hours(self.config.session_ttl_hours as i64),
        };

        let session = self.sessions.create(&data).await?;
        info!(user_id = %user_id, session_id = %session.id, "Auth session issued");

        Ok(IssuedSession { token, session })
    }
}
