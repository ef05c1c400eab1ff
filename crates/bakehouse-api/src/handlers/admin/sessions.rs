//! Back-office "who is online" view.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{Duration, Utc};

use bakehouse_core::config::MAX_ONLINE_WINDOW_MINUTES;

use crate::dto::request::{OnlineQuery, validate_request};
use crate::dto::response::{ApiResponse, OnlineUsersResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/sessions/online?within_minutes=N
pub async fn list_online(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OnlineQuery>,
) -> Result<Json<ApiResponse<OnlineUsersResponse>>, ApiError> {
    require_admin(&auth)?;
    validate_request(&query)?;

    let within_minutes = window_minutes(
        query.within_minutes,
        state.config.session.online_window_minutes,
    );
    let since = Utc::now() - Duration::minutes(i64::try_from(within_minutes).unwrap_or(0));

    let users = state.liveness_repo.find_seen_since(since).await?;
    Ok(Json(ApiResponse::ok(OnlineUsersResponse {
        within_minutes,
        users: users.into_iter().map(Into::into).collect(),
    })))
}

/// Requested window, else the configured one, capped at one day.
fn window_minutes(requested: Option<u64>, configured: u64) -> u64 {
    requested
        .unwrap_or(configured)
        .clamp(1, MAX_ONLINE_WINDOW_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_prefers_request() {
        assert_eq!(window_minutes(Some(15), 10), 15);
        assert_eq!(window_minutes(None, 10), 10);
    }

    #[test]
    fn test_window_is_capped() {
        assert_eq!(window_minutes(None, u64::MAX), MAX_ONLINE_WINDOW_MINUTES);
        assert_eq!(window_minutes(None, 0), 1);
    }
}
