//! Shared domain types.

pub mod id;
pub mod session;

pub use id::{SessionId, UserId};
pub use session::{LogoutReason, Redirect, Session};
