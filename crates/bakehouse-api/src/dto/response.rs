//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bakehouse_entity::profile::Profile;
use bakehouse_entity::session::{OnlineUser, UserSession};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Result of a heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    /// Timestamp written to the liveness row.
    pub last_seen_at: DateTime<Utc>,
}

impl From<UserSession> for HeartbeatResponse {
    fn from(row: UserSession) -> Self {
        Self {
            last_seen_at: row.last_seen_at,
        }
    }
}

/// The caller's account flag. `null` when it could not be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveResponse {
    /// Value of `profiles.active`.
    pub active: Option<bool>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// One row of the back-office online view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineUserResponse {
    /// User ID.
    pub user_id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Whether the account is enabled.
    pub active: bool,
    /// Latest heartbeat.
    pub last_seen_at: DateTime<Utc>,
    /// Client of the latest heartbeat.
    pub user_agent: Option<String>,
}

impl From<OnlineUser> for OnlineUserResponse {
    fn from(row: OnlineUser) -> Self {
        Self {
            user_id: row.user_id,
            display_name: row.display_name,
            active: row.active,
            last_seen_at: row.last_seen_at,
            user_agent: row.user_agent,
        }
    }
}

/// Online users seen within a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineUsersResponse {
    /// Window used, in minutes.
    pub within_minutes: u64,
    /// Matching users, most recently seen first.
    pub users: Vec<OnlineUserResponse>,
}

/// Profile summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Role.
    pub role: String,
    /// Whether the account is enabled.
    pub active: bool,
    /// Last profile change.
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for UserResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            display_name: profile.display_name,
            role: profile.role.to_string(),
            active: profile.active,
            updated_at: profile.updated_at,
        }
    }
}

/// A freshly issued terminal session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedSessionResponse {
    /// Raw bearer token. Shown once.
    pub token: String,
    /// Session ID.
    pub session_id: Uuid,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
}
