//! Shared application state passed to all Axum handlers.

use std::sync::Arc;

use sqlx::PgPool;

use bakehouse_auth::{SessionIssuer, SessionResolver};
use bakehouse_core::config::AppConfig;
use bakehouse_database::repositories::{
    AuthSessionRepository, LivenessRepository, ProfileRepository,
};

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database connection pool.
    pub db_pool: PgPool,

    // -- Repositories --
    /// Profile repository.
    pub profile_repo: Arc<ProfileRepository>,
    /// Auth session repository.
    pub auth_session_repo: Arc<AuthSessionRepository>,
    /// Liveness repository.
    pub liveness_repo: Arc<LivenessRepository>,

    // -- Auth --
    /// Bearer token resolver.
    pub resolver: Arc<SessionResolver>,
    /// Auth session issuer.
    pub issuer: Arc<SessionIssuer>,
}

impl AppState {
    /// Wire repositories and auth services over `db_pool`.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let profile_repo = Arc::new(ProfileRepository::new(db_pool.clone()));
        let auth_session_repo = Arc::new(AuthSessionRepository::new(db_pool.clone()));
        let liveness_repo = Arc::new(LivenessRepository::new(db_pool.clone()));

        let resolver = Arc::new(SessionResolver::new(
            Arc::clone(&auth_session_repo),
            Arc::clone(&profile_repo),
        ));
        let issuer = Arc::new(SessionIssuer::new(
            Arc::clone(&auth_session_repo),
            config.auth.clone(),
        ));

        Self {
            config: Arc::new(config),
            db_pool,
            profile_repo,
            auth_session_repo,
            liveness_repo,
            resolver,
            issuer,
        }
    }
}
