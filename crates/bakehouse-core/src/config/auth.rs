//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Auth-session issuing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of an issued auth session in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    12
}
