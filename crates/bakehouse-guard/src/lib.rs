//! # bakehouse-guard
//!
//! Client session liveness for Bakehouse terminals and browser hosts:
//!
//! - [`InactivityGuard`] logs the user out after a period without input,
//! - [`AccountActivePoller`] logs the user out once an admin disables the
//!   account,
//! - [`HeartbeatPublisher`] keeps the user's liveness row fresh for the
//!   back-office "who is online" view.
//!
//! [`SessionGuard`] owns all three and ties their lifetimes together.
//! Timers come from an injected [`Scheduler`].

pub mod account;
pub mod activity;
pub mod config;
pub mod heartbeat;
pub mod inactivity;
mod logout;
pub mod memory;
pub mod navigator;
pub mod scheduler;
pub mod supervisor;

pub use account::{AccountActivePoller, PollOutcome};
pub use activity::{ActivityKind, ActivityTracker};
pub use config::{DEFAULT_ACCOUNT_POLL_INTERVAL, DEFAULT_HEARTBEAT_INTERVAL, GuardConfig};
pub use heartbeat::{HeartbeatOutcome, HeartbeatPublisher};
pub use inactivity::{InactivityGuard, TimerState};
pub use memory::{LivenessRow, MemorySessionStore, StoreCalls};
pub use navigator::ChannelNavigator;
pub use scheduler::{Scheduler, TaskFn, TaskHandle, TokioScheduler};
pub use supervisor::SessionGuard;
