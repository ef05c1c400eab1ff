//! Session guard supervisor.

use std::sync::Arc;

use bakehouse_core::traits::{Navigator, SessionStore};

use crate::account::AccountActivePoller;
use crate::activity::ActivityKind;
use crate::config::GuardConfig;
use crate::heartbeat::HeartbeatPublisher;
use crate::inactivity::InactivityGuard;
use crate::scheduler::Scheduler;

/// Owns the inactivity guard, account poller, and heartbeat publisher for
/// one signed-in client and starts and stops them together.
///
/// The three components share the store, navigator, and scheduler but no
/// other state. Dropping the supervisor stops everything.
#[derive(Debug)]
pub struct SessionGuard {
    inactivity: InactivityGuard,
    poller: AccountActivePoller,
    heartbeat: HeartbeatPublisher,
}

impl SessionGuard {
    /// Build the three components. Nothing runs until [`start`](Self::start).
    pub fn new(
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        scheduler: Arc<dyn Scheduler>,
        config: GuardConfig,
    ) -> Self {
        let inactivity = InactivityGuard::new(
            Arc::clone(&store),
            Arc::clone(&navigator),
            Arc::clone(&scheduler),
            config.inactivity_timeout,
            config.activity_throttle,
        );
        let poller = AccountActivePoller::new(
            Arc::clone(&store),
            navigator,
            Arc::clone(&scheduler),
            config.account_poll_interval,
        );
        let heartbeat = HeartbeatPublisher::new(
            store,
            scheduler,
            config.heartbeat_interval,
            config.client_info,
        );

        Self {
            inactivity,
            poller,
            heartbeat,
        }
    }

    /// Start all three components.
    pub fn start(&self) {
        self.inactivity.start();
        self.poller.start();
        self.heartbeat.start();
        tracing::info!("Session guard started");
    }

    /// Stop all three components. Idempotent.
    pub fn stop(&self) {
        self.inactivity.stop();
        self.poller.stop();
        self.heartbeat.stop();
        tracing::debug!("Session guard stopped");
    }

    /// Forward user input to the inactivity guard.
    pub fn record_activity(&self, kind: ActivityKind) -> bool {
        self.inactivity.record_activity(kind)
    }

    /// Forward a raw DOM event name to the inactivity guard.
    pub fn record_event(&self, name: &str) -> bool {
        self.inactivity.record_event(name)
    }

    /// The inactivity guard.
    pub fn inactivity(&self) -> &InactivityGuard {
        &self.inactivity
    }

    /// The account-active poller.
    pub fn poller(&self) -> &AccountActivePoller {
        &self.poller
    }

    /// The heartbeat publisher.
    pub fn heartbeat(&self) -> &HeartbeatPublisher {
        &self.heartbeat
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bakehouse_core::types::UserId;

    use super::*;
    use crate::inactivity::TimerState;
    use crate::memory::MemorySessionStore;
    use crate::navigator::ChannelNavigator;
    use crate::scheduler::TokioScheduler;

    #[tokio::test(start_paused = true)]
    async fn test_start_runs_all_components() {
        let store = Arc::new(MemorySessionStore::signed_in(UserId::new()));
        let (navigator, _rx) = ChannelNavigator::new();
        let guard = SessionGuard::new(
            store.clone(),
            Arc::new(navigator),
            Arc::new(TokioScheduler::new()),
            GuardConfig::default(),
        );

        guard.start();
        tokio::time::sleep(Duration::from_millis(1)).await;

        let calls = store.calls();
        assert_eq!(calls.profile_active_flag, 1);
        assert_eq!(calls.upsert_liveness, 1);
        assert_eq!(guard.inactivity().state(), TimerState::Armed);
        assert!(guard.poller().is_running());
        assert!(guard.heartbeat().is_running());

        guard.stop();
        assert_eq!(guard.inactivity().state(), TimerState::Cancelled);
        assert!(!guard.poller().is_running());
        assert!(!guard.heartbeat().is_running());
    }
}
