//! Admin account management handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use bakehouse_core::error::AppError;
use bakehouse_core::types::UserId;
use bakehouse_entity::profile::{CreateProfile, UserRole};

use crate::dto::request::{
    CreateUserRequest, IssueSessionRequest, SetActiveRequest, validate_request,
};
use crate::dto::response::{ApiResponse, IssuedSessionResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    require_admin(&auth)?;
    validate_request(&req)?;
    let role: UserRole = req.role.parse()?;

    let profile = state
        .profile_repo
        .create(&CreateProfile {
            id: None,
            display_name: req.display_name,
            role,
        })
        .await?;

    tracing::info!(
        admin_id = %auth.user_id,
        user_id = %profile.id,
        role = %role,
        "User created"
    );
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// PATCH /api/admin/users/{id}/active
///
/// Disabled users are logged out by their clients on the next account check.
pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    require_admin(&auth)?;
    if id == auth.user_id.into_uuid() && !req.active {
        return Err(AppError::validation("Admins cannot deactivate themselves").into());
    }

    let profile = state
        .profile_repo
        .set_active(id, req.active)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

    tracing::info!(
        admin_id = %auth.user_id,
        user_id = %id,
        active = req.active,
        "Account active flag changed"
    );
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// POST /api/admin/users/{id}/sessions
///
/// Issues a bearer token for a shop-floor terminal signed in as `id`.
pub async fn issue_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<IssueSessionRequest>,
) -> Result<Json<ApiResponse<IssuedSessionResponse>>, ApiError> {
    require_admin(&auth)?;
    validate_request(&req)?;

    let profile = state
        .profile_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    if !profile.active {
        return Err(AppError::conflict("Account is deactivated").into());
    }

    let issued = state
        .issuer
        .issue(UserId::from_uuid(profile.id), req.device.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(IssuedSessionResponse {
        token: issued.token,
        session_id: issued.session.id,
        expires_at: issued.session.expires_at,
    })))
}
