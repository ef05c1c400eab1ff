//! Profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A staff account as seen by the application.
///
/// `active` is mutated only by back-office administration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// User identifier (shared with the auth provider).
    pub id: Uuid,
    /// Name shown in the back office.
    pub display_name: String,
    /// Account role.
    pub role: UserRole,
    /// Whether the account is administratively enabled.
    pub active: bool,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    /// Optional fixed identifier; a random one is used otherwise.
    pub id: Option<Uuid>,
    /// Display name.
    pub display_name: String,
    /// Account role.
    pub role: UserRole,
}
