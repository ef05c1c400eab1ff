//! Forced logout shared by the inactivity guard and the account poller.

use bakehouse_core::traits::{Navigator, SessionStore};
use bakehouse_core::types::LogoutReason;

/// Sign out once and redirect to the login view with `reason`.
///
/// The redirect happens even when sign-out fails.
pub(crate) async fn force_logout(
    store: &dyn SessionStore,
    navigator: &dyn Navigator,
    reason: LogoutReason,
) {
    if let Err(e) = store.sign_out().await {
        tracing::warn!(reason = %reason, error = %e, "Sign-out failed, redirecting anyway");
    }
    tracing::info!(reason = %reason, "Session ended");
    navigator.navigate_to(reason.login_redirect());
}
