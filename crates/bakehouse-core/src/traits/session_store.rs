//! Session store client trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::AppResult;
use crate::types::id::UserId;
use crate::types::session::Session;

/// Access to the hosted auth provider and the rows the session guard reads
/// and writes.
///
/// Every call is a single request/response against an eventually
/// consistent backend; implementations never hold locks across calls.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the signed-in principal, or `None` when nobody is signed in.
    async fn current_session(&self) -> AppResult<Option<Session>>;

    /// Invalidate the current session.
    async fn sign_out(&self) -> AppResult<()>;

    /// Fetch the administrative `active` flag for a user.
    ///
    /// Returns `None` when the flag is missing or the read failed for any
    /// reason; callers must treat `None` as "unknown", not "disabled".
    async fn profile_active_flag(&self, user_id: UserId) -> Option<bool>;

    /// Insert or overwrite the liveness record for `user_id`.
    async fn upsert_liveness(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
        client_info: &str,
    ) -> AppResult<()>;
}
