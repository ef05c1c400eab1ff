//! Auth session issuing, bearer-token resolution, and the session store.

pub mod issuer;
pub mod resolver;
pub mod store;

pub use issuer::{IssuedSession, SessionIssuer};
pub use resolver::{AuthenticatedUser, SessionResolver};
pub use store::DatabaseSessionStore;
