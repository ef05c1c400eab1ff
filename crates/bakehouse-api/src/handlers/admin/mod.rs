//! Back-office handlers. Every handler requires the admin role.

pub mod sessions;
pub mod users;
