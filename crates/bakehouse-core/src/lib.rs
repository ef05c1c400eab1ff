//! # bakehouse-core
//!
//! Core crate for Bakehouse. Contains configuration schemas, typed
//! identifiers, session and redirect types, the capability traits the
//! session guard is built on, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Bakehouse crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
