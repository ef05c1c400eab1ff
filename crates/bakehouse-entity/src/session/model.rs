//! Auth session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bearer-token login issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthSession {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the bearer token.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// User-Agent the session was issued to.
    pub user_agent: Option<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// When the session was signed out, if it was.
    pub terminated_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Not terminated and not expired as of `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.terminated_at.is_none() && self.expires_at > now
    }

    /// Check whether the session is still valid right now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Input for creating an auth session.
#[derive(Debug, Clone)]
pub struct CreateAuthSession {
    /// Owner.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the bearer token.
    pub token_hash: String,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}
