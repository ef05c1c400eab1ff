//! # bakehouse-auth
//!
//! Bearer-token handling for Bakehouse auth sessions.
//!
//! ## Modules
//!
//! - `token`: token generation and SHA-256 hashing
//! - `session`: issuing sessions, resolving bearer tokens, and the
//!   Postgres-backed [`SessionStore`](bakehouse_core::traits::SessionStore)

pub mod session;
pub mod token;

pub use session::{AuthenticatedUser, DatabaseSessionStore, SessionIssuer, SessionResolver};
