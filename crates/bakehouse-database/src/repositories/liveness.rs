//! Liveness (`user_sessions`) repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bakehouse_core::error::{AppError, ErrorKind};
use bakehouse_core::result::AppResult;
use bakehouse_entity::session::{OnlineUser, UserSession};

/// Repository for the one-row-per-user liveness table.
#[derive(Debug, Clone)]
pub struct LivenessRepository {
    pool: PgPool,
}

impl LivenessRepository {
    /// Create a new liveness repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite the liveness row for a user (last writer wins).
    pub async fn upsert(
        &self,
        user_id: Uuid,
        last_seen_at: DateTime<Utc>,
        user_agent: &str,
    ) -> AppResult<UserSession> {
        sqlx::query_as::<_, UserSession>(
            "INSERT INTO user_sessions (user_id, last_seen_at, user_agent) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE \
             SET last_seen_at = EXCLUDED.last_seen_at, user_agent = EXCLUDED.user_agent \
             RETURNING *",
        )
        .bind(user_id)
        .bind(last_seen_at)
        .bind(user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert liveness record", e)
        })
    }

    /// Find the liveness row for a user.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<UserSession>> {
        sqlx::query_as::<_, UserSession>("SELECT * FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find liveness record", e)
            })
    }

    /// Users whose latest heartbeat is at or after `since`, newest first.
    pub async fn find_seen_since(&self, since: DateTime<Utc>) -> AppResult<Vec<OnlineUser>> {
        sqlx::query_as::<_, OnlineUser>(
            "SELECT us.user_id, p.display_name, p.active, us.last_seen_at, us.user_agent \
             FROM user_sessions us JOIN profiles p ON p.id = us.user_id \
             WHERE us.last_seen_at >= $1 \
             ORDER BY us.last_seen_at DESC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list online users", e)
        })
    }
}
