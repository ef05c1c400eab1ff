//! # bakehouse-entity
//!
//! Row models for Bakehouse. Every struct in this crate represents a
//! database table row or a projection of one. Database entities derive
//! `sqlx::FromRow`.

pub mod profile;
pub mod session;
