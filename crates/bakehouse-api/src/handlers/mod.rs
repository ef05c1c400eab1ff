//! Route handlers organized by domain.

pub mod admin;
pub mod health;
pub mod sessions;
