//! # bakehouse-database
//!
//! PostgreSQL connection management and concrete repositories for
//! profiles, auth sessions, and liveness records.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
