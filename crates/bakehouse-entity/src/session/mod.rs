//! Auth session and liveness entities.

pub mod liveness;
pub mod model;

pub use liveness::{OnlineUser, UserSession};
pub use model::{AuthSession, CreateAuthSession};
