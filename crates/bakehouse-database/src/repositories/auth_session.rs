//! Auth session repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use bakehouse_core::error::{AppError, ErrorKind};
use bakehouse_core::result::AppResult;
use bakehouse_entity::session::{AuthSession, CreateAuthSession};

/// Repository for bearer-token auth sessions.
#[derive(Debug, Clone)]
pub struct AuthSessionRepository {
    pool: PgPool,
}

impl AuthSessionRepository {
    /// Create a new auth session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a live (not terminated, not expired) session by token hash.
    pub async fn find_active_by_token_hash(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<AuthSession>> {
        sqlx::query_as::<_, AuthSession>(
            "SELECT * FROM auth_sessions \
             WHERE token_hash = $1 AND terminated_at IS NULL AND expires_at > NOW()",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by token", e)
        })
    }

    /// Create a new auth session.
    pub async fn create(&self, data: &CreateAuthSession) -> AppResult<AuthSession> {
        sqlx::query_as::<_, AuthSession>(
            "INSERT INTO auth_sessions (user_id, token_hash, user_agent, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.token_hash)
        .bind(&data.user_agent)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Terminate the session with this token hash. Returns `true` if a live
    /// session was terminated.
    pub async fn terminate_by_token_hash(&self, token_hash: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET terminated_at = NOW() \
             WHERE token_hash = $1 AND terminated_at IS NULL",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to terminate session", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count live sessions for a user.
    pub async fn count_active_by_user(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM auth_sessions \
             WHERE user_id = $1 AND terminated_at IS NULL AND expires_at > NOW()",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count active sessions", e)
        })
    }
}
