//! Concrete repository implementations.

pub mod auth_session;
pub mod liveness;
pub mod profile;

pub use auth_session::AuthSessionRepository;
pub use liveness::LivenessRepository;
pub use profile::ProfileRepository;
