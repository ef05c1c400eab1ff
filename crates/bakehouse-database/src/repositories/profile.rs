//! Profile repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bakehouse_core::error::{AppError, ErrorKind};
use bakehouse_core::result::AppResult;
use bakehouse_entity::profile::model::CreateProfile;
use bakehouse_entity::profile::Profile;

/// Repository for staff profiles and their `active` flag.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))
    }

    /// Read only the `active` flag. `None` when the profile does not exist.
    pub async fn find_active_flag(&self, id: Uuid) -> AppResult<Option<bool>> {
        sqlx::query_scalar::<_, bool>("SELECT active FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to read profile active flag", e)
            })
    }

    /// Create a new profile.
    pub async fn create(&self, data: &CreateProfile) -> AppResult<Profile> {
        sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, display_name, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.id.unwrap_or_else(Uuid::new_v4))
        .bind(&data.display_name)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create profile", e))
    }

    /// Enable or disable an account. Returns the updated profile, or `None`
    /// when no profile has that ID.
    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>(
            "UPDATE profiles SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update profile active flag", e)
        })
    }
}
