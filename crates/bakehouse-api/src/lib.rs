//! # bakehouse-api
//!
//! HTTP API layer for Bakehouse built on Axum.
//!
//! Serves the endpoints browser and terminal clients use to keep their
//! session alive (heartbeat, account status, logout) and the back-office
//! endpoints for the "who is online" view and account activation.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
