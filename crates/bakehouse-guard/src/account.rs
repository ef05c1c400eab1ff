//! Account-active poller.
//!
//! Periodically re-reads the signed-in user's `active` flag and logs the
//! user out once an administrator has disabled the account. Any failure to
//! read the flag fails open.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;

use bakehouse_core::traits::{Navigator, SessionStore};
use bakehouse_core::types::LogoutReason;

use crate::config::DEFAULT_ACCOUNT_POLL_INTERVAL;
use crate::logout::force_logout;
use crate::scheduler::{Scheduler, TaskFn, TaskHandle};

/// Result of a single account check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nobody is signed in.
    NoSession,
    /// The account is active.
    Active,
    /// The flag could not be read; treated as active.
    Unknown,
    /// The account is disabled; the user was logged out.
    Deactivated,
    /// The session lookup failed; the cycle was skipped.
    Skipped,
}

#[derive(Debug)]
struct PollerState {
    interval: Duration,
    handle: Option<TaskHandle>,
}

#[derive(Debug)]
struct Inner {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<PollerState>,
}

/// Checks the account's `active` flag on a fixed interval.
#[derive(Debug)]
pub struct AccountActivePoller {
    inner: Arc<Inner>,
}

impl AccountActivePoller {
    /// Create a poller. Nothing is scheduled until [`start`](Self::start).
    ///
    /// A zero `interval` falls back to [`DEFAULT_ACCOUNT_POLL_INTERVAL`].
    pub fn new(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        scheduler: Arc<dyn Scheduler>,
        interval: Duration,
    ) -> Self {
        let interval = if interval.is_zero() {
            tracing::warn!(
                fallback_secs = DEFAULT_ACCOUNT_POLL_INTERVAL.as_secs(),
                "Zero account poll interval, using default"
            );
            DEFAULT_ACCOUNT_POLL_INTERVAL
        } else {
            interval
        };

        Self {
            inner: Arc::new(Inner {
                store,
                navigator,
                scheduler,
                state: Mutex::new(PollerState {
                    interval,
                    handle: None,
                }),
            }),
        }
    }

    /// Check immediately, then every interval. No-op while running.
    pub fn start(&self) {
        let mut state = self.inner.lock();
        if state.handle.is_some() {
            return;
        }
        state.handle = Some(Inner::schedule(&self.inner, state.interval));
        tracing::debug!(interval_secs = state.interval.as_secs(), "Account poller started");
    }

    /// Cancel polling. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = self.inner.lock().handle.take() {
            handle.cancel();
            tracing::debug!("Account poller stopped");
        }
    }

    /// Whether polling is scheduled.
    pub fn is_running(&self) -> bool {
        self.inner.lock().handle.is_some()
    }

    /// Current polling interval.
    pub fn interval(&self) -> Duration {
        self.inner.lock().interval
    }

    /// Change the polling interval.
    ///
    /// A running poller is rescheduled (with an immediate check) only when
    /// the period actually changes. A zero period is ignored and the
    /// current one stays in effect.
    pub fn set_interval(&self, interval: Duration) {
        if interval.is_zero() {
            tracing::warn!("Ignoring zero account poll interval");
            return;
        }

        let mut state = self.inner.lock();
        if state.interval == interval {
            return;
        }
        state.interval = interval;
        if state.handle.is_some() {
            state.handle = Some(Inner::schedule(&self.inner, interval));
            tracing::debug!(interval_secs = interval.as_secs(), "Account poller rescheduled");
        }
    }

    /// Run one check now.
    pub async fn check_once(&self) -> PollOutcome {
        self.inner.check().await
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule(this: &Arc<Self>, interval: Duration) -> TaskHandle {
        let weak = Arc::downgrade(this);
        let task: TaskFn = Arc::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    inner.check().await;
                }
            }
            .boxed()
        });
        this.scheduler.every("account-poll", interval, true, task)
    }

    async fn check(&self) -> PollOutcome {
        let session = match self.store.current_session().await {
            Ok(Some(session)) if session.valid => session,
            Ok(_) => return PollOutcome::NoSession,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, skipping account check");
                return PollOutcome::Skipped;
            }
        };

        match self.store.profile_active_flag(session.user_id).await {
            Some(true) => PollOutcome::Active,
            None => {
                tracing::debug!(user_id = %session.user_id, "Active flag unknown, failing open");
                PollOutcome::Unknown
            }
            Some(false) => {
                tracing::info!(user_id = %session.user_id, "Account deactivated");
                force_logout(
                    self.store.as_ref(),
                    self.navigator.as_ref(),
                    LogoutReason::Deactivated,
                )
                .await;
                PollOutcome::Deactivated
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bakehouse_core::types::{Redirect, UserId};
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::memory::MemorySessionStore;
    use crate::navigator::ChannelNavigator;
    use crate::scheduler::TokioScheduler;

    const INTERVAL: Duration = Duration::from_secs(60);

    fn poller(
        store: &Arc<MemorySessionStore>,
    ) -> (AccountActivePoller, UnboundedReceiver<Redirect>) {
        let (navigator, rx) = ChannelNavigator::new();
        let poller = AccountActivePoller::new(
            store.clone(),
            Arc::new(navigator),
            Arc::new(TokioScheduler::new()),
            INTERVAL,
        );
        (poller, rx)
    }

    #[tokio::test]
    async fn test_check_outcomes() {
        let user = UserId::new();
        let store = Arc::new(MemorySessionStore::signed_in(user));
        let (poller, mut rx) = poller(&store);

        assert_eq!(poller.check_once().await, PollOutcome::Active);

        store.set_profile_active(user, None);
        assert_eq!(poller.check_once().await, PollOutcome::Unknown);

        store.set_outage(true);
        assert_eq!(poller.check_once().await, PollOutcome::Skipped);
        store.set_outage(false);

        store.set_profile_active(user, Some(false));
        assert_eq!(poller.check_once().await, PollOutcome::Deactivated);
        assert_eq!(
            rx.try_recv().ok().map(|r| r.to_url()).as_deref(),
            Some("/login?reason=deactivated")
        );

        assert_eq!(poller.check_once().await, PollOutcome::NoSession);
        assert_eq!(store.calls().sign_out, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_check_is_immediate() {
        let store = Arc::new(MemorySessionStore::signed_in(UserId::new()));
        let (poller, _rx) = poller(&store);
        poller.start();
        assert!(poller.is_running());

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(store.calls().profile_active_flag, 1);

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(store.calls().profile_active_flag, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_interval_same_period_is_noop() {
        let store = Arc::new(MemorySessionStore::signed_in(UserId::new()));
        let (poller, _rx) = poller(&store);
        poller.start();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.calls().profile_active_flag, 1);

        poller.set_interval(INTERVAL);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(store.calls().profile_active_flag, 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.calls().profile_active_flag, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_interval_reschedules_running_poller() {
        let store = Arc::new(MemorySessionStore::signed_in(UserId::new()));
        let (poller, _rx) = poller(&store);
        poller.start();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.calls().profile_active_flag, 1);

        poller.set_interval(Duration::from_secs(10));
        assert_eq!(poller.interval(), Duration::from_secs(10));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(store.calls().profile_active_flag, 2);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(store.calls().profile_active_flag, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_keeps_enforcing_deactivation() {
        let user = UserId::new();
        let store = Arc::new(MemorySessionStore::signed_in(user));
        let (poller, mut rx) = poller(&store);
        poller.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(store.calls().profile_active_flag, 1);

        poller.set_interval(Duration::ZERO);
        assert_eq!(poller.interval(), INTERVAL);
        assert!(poller.is_running());

        store.set_profile_active(user, Some(false));
        tokio::time::sleep(INTERVAL).await;
        assert_eq!(store.calls().profile_active_flag, 2);
        assert_eq!(store.calls().sign_out, 1);
        assert_eq!(
            rx.try_recv().ok().map(|r| r.to_url()).as_deref(),
            Some("/login?reason=deactivated")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_at_construction_uses_default() {
        let store = Arc::new(MemorySessionStore::signed_in(UserId::new()));
        let (navigator, _rx) = ChannelNavigator::new();
        let poller = AccountActivePoller::new(
            store.clone(),
            Arc::new(navigator),
            Arc::new(TokioScheduler::new()),
            Duration::ZERO,
        );
        assert_eq!(poller.interval(), DEFAULT_ACCOUNT_POLL_INTERVAL);

        poller.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        tokio::time::sleep(DEFAULT_ACCOUNT_POLL_INTERVAL).await;
        assert_eq!(store.calls().profile_active_flag, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_interval_while_stopped_only_records() {
        let store = Arc::new(MemorySessionStore::signed_in(UserId::new()));
        let (poller, _rx) = poller(&store);
        poller.set_interval(Duration::from_secs(5));
        assert!(!poller.is_running());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.calls().total(), 0);
    }
}
