//! Session principal, logout reasons and login redirects.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Path of the login view forced logouts land on.
pub const LOGIN_PATH: &str = "/login";

/// Query parameter carrying the logout reason.
pub const REASON_PARAM: &str = "reason";

/// The signed-in principal as reported by the auth provider.
///
/// Never persisted locally; every check fetches a fresh copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Signed-in user.
    pub user_id: UserId,
    /// Whether the provider still considers the session valid.
    pub valid: bool,
}

impl Session {
    /// A valid session for `user_id`.
    pub fn active(user_id: UserId) -> Self {
        Self {
            user_id,
            valid: true,
        }
    }
}

/// Why the guard ended a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// No qualifying input for the inactivity timeout.
    Inactivity,
    /// The account was disabled by an administrator.
    Deactivated,
}

impl LogoutReason {
    /// Value used in the login redirect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactivity => "inactivity",
            Self::Deactivated => "deactivated",
        }
    }

    /// Redirect to the login view carrying this reason.
    pub fn login_redirect(self) -> Redirect {
        Redirect::new(LOGIN_PATH).with_param(REASON_PARAM, self.as_str())
    }
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client-side navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    /// Target path.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
}

impl Redirect {
    /// Redirect to `path` without parameters.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Look up the first value of a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as `path?k=v&k2=v2`.
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}
