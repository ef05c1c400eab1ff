//! Convenience result type alias for Bakehouse.

use crate::error::AppError;

/// A specialized `Result` type for Bakehouse operations.
pub type AppResult<T> = Result<T, AppError>;
