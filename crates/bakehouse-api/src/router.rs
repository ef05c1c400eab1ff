//! Route definitions for the Bakehouse HTTP API.
//!
//! All routes are mounted under `/api` and receive `AppState` through
//! Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(session_routes())
        .merge(admin_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness probe
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Client session liveness: heartbeat, account status, logout
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/heartbeat", post(handlers::sessions::heartbeat))
        .route("/sessions/me/active", get(handlers::sessions::my_active_flag))
        .route("/sessions/logout", post(handlers::sessions::logout))
}

/// Back-office presence and account administration
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/sessions/online",
            get(handlers::admin::sessions::list_online),
        )
        .route("/admin/users", post(handlers::admin::users::create_user))
        .route(
            "/admin/users/{id}/active",
            patch(handlers::admin::users::set_active),
        )
        .route(
            "/admin/users/{id}/sessions",
            post(handlers::admin::users::issue_session),
        )
}
