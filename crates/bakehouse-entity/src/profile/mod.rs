//! Profile (user account) entities.

pub mod model;
pub mod role;

pub use model::{CreateProfile, Profile};
pub use role::UserRole;
