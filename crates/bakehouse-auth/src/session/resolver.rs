//! Resolves bearer tokens to authenticated users.

use std::sync::Arc;

use bakehouse_core::error::AppError;
use bakehouse_core::result::AppResult;
use bakehouse_core::types::{SessionId, UserId};
use bakehouse_database::repositories::{AuthSessionRepository, ProfileRepository};
use bakehouse_entity::profile::{Profile, UserRole};
use bakehouse_entity::session::AuthSession;

use crate::token::hash_token;

/// The caller behind a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Auth session the token belongs to.
    pub session_id: SessionId,
    /// Session owner.
    pub user_id: UserId,
    /// Owner's role.
    pub role: UserRole,
    /// Owner's display name.
    pub display_name: String,
    /// Hash of the presented token.
    pub token_hash: String,
}

/// Looks up the auth session and profile for a bearer token.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    sessions: Arc<AuthSessionRepository>,
    profiles: Arc<ProfileRepository>,
}

impl SessionResolver {
    /// Creates a new resolver.
    pub fn new(sessions: Arc<AuthSessionRepository>, profiles: Arc<ProfileRepository>) -> Self {
        Self { sessions, profiles }
    }

    /// Resolve a raw bearer token.
    ///
    /// Unknown, expired, and signed-out tokens are `Unauthorized`; a valid
    /// token for a disabled account is `Forbidden`.
    pub async fn resolve(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let session = self.resolve_session(token).await?;

        let profile = self
            .profiles
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Session owner no longer exists"))?;

        check_profile_enabled(&profile)?;

        Ok(AuthenticatedUser {
            session_id: SessionId::from_uuid(session.id),
            user_id: UserId::from_uuid(profile.id),
            role: profile.role,
            display_name: profile.display_name,
            token_hash: session.token_hash,
        })
    }

    /// Resolve a raw bearer token to its auth session without checking the
    /// owner's profile.
    ///
    /// Lets a disabled account still read its own status and sign out.
    pub async fn resolve_session(&self, token: &str) -> AppResult<AuthSession> {
        self.sessions
            .find_active_by_token_hash(&hash_token(token))
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired session"))
    }
}

fn check_profile_enabled(profile: &Profile) -> AppResult<()> {
    if !profile.active {
        return Err(AppError::forbidden("Account is deactivated"));
    }
    Ok(())
}
