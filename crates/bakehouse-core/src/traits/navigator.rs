//! Client-side navigation trait.

use crate::types::session::Redirect;

/// Performs client-side redirects on behalf of the session guard.
pub trait Navigator: Send + Sync + std::fmt::Debug + 'static {
    /// Navigate to `redirect.path` with its query parameters.
    fn navigate_to(&self, redirect: Redirect);
}
