//! Inactivity guard.
//!
//! Signs the user out after a configurable idle period. Qualifying input
//! is throttled by an [`ActivityTracker`]; every accepted event replaces
//! the pending deadline with a fresh one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::FutureExt;
use tokio::time::Instant;

use bakehouse_core::traits::{Navigator, SessionStore};
use bakehouse_core::types::LogoutReason;

use crate::activity::{ActivityKind, ActivityTracker};
use crate::logout::force_logout;
use crate::scheduler::{Scheduler, TaskHandle};

/// Lifecycle of the inactivity deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Never started.
    Idle,
    /// A deadline is pending.
    Armed,
    /// The deadline elapsed and the user was logged out.
    Fired,
    /// Stopped by the host.
    Cancelled,
}

#[derive(Debug)]
struct GuardState {
    tracker: ActivityTracker,
    timer: TimerState,
    generation: u64,
    deadline: Option<TaskHandle>,
}

#[derive(Debug)]
struct Inner {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    scheduler: Arc<dyn Scheduler>,
    timeout: Duration,
    state: Mutex<GuardState>,
}

/// Logs the user out after `timeout` without accepted activity.
#[derive(Debug)]
pub struct InactivityGuard {
    inner: Arc<Inner>,
}

impl InactivityGuard {
    /// Create a guard. Nothing is scheduled until [`start`](Self::start).
    pub fn new(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        scheduler: Arc<dyn Scheduler>,
        timeout: Duration,
        throttle: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                navigator,
                scheduler,
                timeout,
                state: Mutex::new(GuardState {
                    tracker: ActivityTracker::new(throttle),
                    timer: TimerState::Idle,
                    generation: 0,
                    deadline: None,
                }),
            }),
        }
    }

    /// Arm the deadline, counting now as the last activity.
    ///
    /// No-op while already armed. Restarts a fired or stopped guard.
    pub fn start(&self) {
        let mut state = self.inner.lock();
        if state.timer == TimerState::Armed {
            return;
        }
        let now = self.inner.scheduler.now();
        state.tracker.reset(now);
        state.timer = TimerState::Armed;
        Inner::arm(&self.inner, &mut state);

        tracing::debug!(
            timeout_secs = self.inner.timeout.as_secs(),
            throttle_secs = state.tracker.throttle().as_secs(),
            "Inactivity guard started"
        );
    }

    /// Cancel the pending deadline and ignore further input. Idempotent.
    pub fn stop(&self) {
        let mut state = self.inner.lock();
        if let Some(deadline) = state.deadline.take() {
            deadline.cancel();
        }
        state.generation += 1;
        if state.timer != TimerState::Idle && state.timer != TimerState::Cancelled {
            state.timer = TimerState::Cancelled;
            tracing::debug!("Inactivity guard stopped");
        }
    }

    /// Feed one input event. Returns `true` if it rearmed the deadline.
    pub fn record_activity(&self, kind: ActivityKind) -> bool {
        let now = self.inner.scheduler.now();
        let mut state = self.inner.lock();
        if state.timer != TimerState::Armed {
            return false;
        }
        if !state.tracker.observe(now) {
            return false;
        }

        Inner::arm(&self.inner, &mut state);
        tracing::trace!(kind = %kind, "Activity accepted");
        true
    }

    /// Feed a raw DOM event name. Non-qualifying names are ignored.
    pub fn record_event(&self, name: &str) -> bool {
        match ActivityKind::from_event_name(name) {
            Some(kind) => self.record_activity(kind),
            None => false,
        }
    }

    /// Current timer state.
    pub fn state(&self) -> TimerState {
        self.inner.lock().timer
    }

    /// When the pending deadline elapses, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        let state = self.inner.lock();
        if state.timer != TimerState::Armed {
            return None;
        }
        state
            .tracker
            .last_accepted()
            .map(|last| last + self.inner.timeout)
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the pending deadline with one `timeout` from now.
    fn arm(this: &Arc<Self>, state: &mut GuardState) {
        state.generation += 1;
        let generation = state.generation;
        let weak: Weak<Self> = Arc::downgrade(this);

        let task = async move {
            if let Some(inner) = weak.upgrade() {
                inner.expire(generation).await;
            }
        }
        .boxed();

        state.deadline = Some(
            this.scheduler
                .after("inactivity-deadline", this.timeout, task),
        );
    }

    async fn expire(&self, generation: u64) {
        {
            let mut state = self.lock();
            if state.timer != TimerState::Armed || state.generation != generation {
                return;
            }
            state.timer = TimerState::Fired;
        }

        tracing::info!(
            timeout_secs = self.timeout.as_secs(),
            "No activity within the inactivity timeout"
        );
        force_logout(
            self.store.as_ref(),
            self.navigator.as_ref(),
            LogoutReason::Inactivity,
        )
        .await;
    }
}
