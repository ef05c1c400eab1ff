//! Postgres-backed session store client.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use bakehouse_core::error::AppError;
use bakehouse_core::result::AppResult;
use bakehouse_core::traits::SessionStore;
use bakehouse_core::types::{Session, UserId};
use bakehouse_database::repositories::{
    AuthSessionRepository, LivenessRepository, ProfileRepository,
};

use crate::token::hash_token;

/// [`SessionStore`] over the `auth_sessions`, `profiles`, and
/// `user_sessions` tables.
///
/// Holds the bearer token of the signed-in client in memory, the way a
/// browser tab holds its provider session.
pub struct DatabaseSessionStore {
    sessions: Arc<AuthSessionRepository>,
    profiles: Arc<ProfileRepository>,
    liveness: Arc<LivenessRepository>,
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for DatabaseSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSessionStore")
            .field("signed_in", &self.has_token())
            .finish()
    }
}

impl DatabaseSessionStore {
    /// Creates a store with nobody signed in.
    pub fn new(
        sessions: Arc<AuthSessionRepository>,
        profiles: Arc<ProfileRepository>,
        liveness: Arc<LivenessRepository>,
    ) -> Self {
        Self {
            sessions,
            profiles,
            liveness,
            token: RwLock::new(None),
        }
    }

    /// Sign in with an existing bearer token.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    /// Replace the held bearer token.
    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    fn current_token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn take_token(&self) -> Option<String> {
        match self.token.write() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }

    fn has_token(&self) -> bool {
        self.current_token().is_some()
    }
}

#[async_trait]
impl SessionStore for DatabaseSessionStore {
    async fn current_session(&self) -> AppResult<Option<Session>> {
        let Some(token) = self.current_token() else {
            return Ok(None);
        };

        let session = self
            .sessions
            .find_active_by_token_hash(&hash_token(&token))
            .await?;

        Ok(session.map(|s| Session {
            user_id: UserId::from_uuid(s.user_id),
            valid: s.is_valid(),
        }))
    }

    async fn sign_out(&self) -> AppResult<()> {
        // The local token is dropped even if the remote call fails.
        let Some(token) = self.take_token() else {
            debug!("Sign-out requested with no session held");
            return Ok(());
        };

        let terminated = self
            .sessions
            .terminate_by_token_hash(&hash_token(&token))
            .await
            .map_err(|e| AppError::session(format!("Remote sign-out failed: {e}")))?;

        debug!(terminated, "Signed out");
        Ok(())
    }

    async fn profile_active_flag(&self, user_id: UserId) -> Option<bool> {
        match self.profiles.find_active_flag(user_id.into_uuid()).await {
            Ok(flag) => flag,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to read profile active flag");
                None
            }
        }
    }

    async fn upsert_liveness(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
        client_info: &str,
    ) -> AppResult<()> {
        self.liveness
            .upsert(user_id.into_uuid(), at, client_info)
            .await?;
        Ok(())
    }
}
