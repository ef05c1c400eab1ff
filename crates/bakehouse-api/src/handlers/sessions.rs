//! Session liveness handlers used by signed-in clients.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::dto::response::{ActiveResponse, ApiResponse, HeartbeatResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, SessionUser};
use crate::state::AppState;

/// Client identifier stored when the request has no `User-Agent`.
const UNKNOWN_CLIENT: &str = "unknown";

/// POST /api/sessions/heartbeat
pub async fn heartbeat(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<HeartbeatResponse>>, ApiError> {
    let client = auth.user_agent.as_deref().unwrap_or(UNKNOWN_CLIENT);
    let row = state
        .liveness_repo
        .upsert(auth.user_id.into_uuid(), Utc::now(), client)
        .await?;

    tracing::debug!(user_id = %auth.user_id, "Heartbeat recorded");
    Ok(Json(ApiResponse::ok(row.into())))
}

/// GET /api/sessions/me/active
///
/// Read failures report `null` rather than an error.
pub async fn my_active_flag(
    State(state): State<AppState>,
    SessionUser(session): SessionUser,
) -> Json<ApiResponse<ActiveResponse>> {
    let active = match state.profile_repo.find_active_flag(session.user_id).await {
        Ok(flag) => flag,
        Err(e) => {
            tracing::warn!(user_id = %session.user_id, error = %e, "Active flag lookup failed");
            None
        }
    };

    Json(ApiResponse::ok(ActiveResponse { active }))
}

/// POST /api/sessions/logout
pub async fn logout(
    State(state): State<AppState>,
    SessionUser(session): SessionUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_session_repo
        .terminate_by_token_hash(&session.token_hash)
        .await?;

    tracing::info!(user_id = %session.user_id, session_id = %session.id, "Signed out");
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Signed out".to_string(),
    })))
}
