//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use bakehouse_core::error::AppError;

/// Query for the back-office online view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OnlineQuery {
    /// Look-back window in minutes. Defaults to the configured window.
    #[validate(range(min = 1, max = 1440, message = "within_minutes must be 1..=1440"))]
    pub within_minutes: Option<u64>,
}

/// Enable or disable an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetActiveRequest {
    /// New value of the `active` flag.
    pub active: bool,
}

/// Create a staff or admin profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Name shown in the back office.
    #[validate(length(min = 1, max = 100, message = "display_name must be 1-100 characters"))]
    pub display_name: String,
    /// `admin` or `staff`.
    pub role: String,
}

/// Issue a terminal session for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct IssueSessionRequest {
    /// Label stored as the session's user agent, e.g. the till name.
    #[validate(length(max = 200))]
    pub device: Option<String>,
}

/// Run `validator` rules and map failures to a validation error.
pub fn validate_request<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_window_bounds() {
        let ok = OnlineQuery {
            within_minutes: Some(15),
        };
        assert!(validate_request(&ok).is_ok());
        assert!(validate_request(&OnlineQuery::default()).is_ok());

        for bad in [0, 1441] {
            let query = OnlineQuery {
                within_minutes: Some(bad),
            };
            assert!(validate_request(&query).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_empty_display_name_rejected() {
        let req = CreateUserRequest {
            display_name: String::new(),
            role: "staff".to_string(),
        };
        assert!(validate_request(&req).is_err());
    }
}
