//! Capability traits defined in `bakehouse-core` and implemented by other crates.

pub mod navigator;
pub mod session_store;

pub use navigator::Navigator;
pub use session_store::SessionStore;
