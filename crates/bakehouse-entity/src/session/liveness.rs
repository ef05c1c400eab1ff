//! Liveness ("last seen") records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The single "last seen" row kept per user.
///
/// Only the most recent heartbeat survives: concurrent tabs or devices of
/// the same user overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSession {
    /// Owner, unique.
    pub user_id: Uuid,
    /// Timestamp of the latest heartbeat.
    pub last_seen_at: DateTime<Utc>,
    /// Client identifier sent with the latest heartbeat.
    pub user_agent: Option<String>,
}

/// Liveness row joined with the profile, for the back-office online view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OnlineUser {
    /// User ID.
    pub user_id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Whether the account is still enabled.
    pub active: bool,
    /// Timestamp of the latest heartbeat.
    pub last_seen_at: DateTime<Utc>,
    /// Client identifier sent with the latest heartbeat.
    pub user_agent: Option<String>,
}
