//! Liveness heartbeat publisher.
//!
//! Writes the signed-in user's liveness row on a fixed interval so the
//! back office can show who is online. Failures are logged and the next
//! tick simply tries again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;

use bakehouse_core::traits::SessionStore;

use crate::config::DEFAULT_HEARTBEAT_INTERVAL;
use crate::scheduler::{Scheduler, TaskFn, TaskHandle};

/// Result of a single heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatOutcome {
    /// Nobody is signed in.
    Skipped,
    /// The liveness row was written.
    Published {
        /// Timestamp written to the row.
        at: DateTime<Utc>,
    },
    /// The session lookup or the write failed.
    Failed,
}

#[derive(Debug)]
struct Inner {
    store: Arc<dyn SessionStore>,
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
    client_info: String,
    handle: Mutex<Option<TaskHandle>>,
}

/// Publishes liveness heartbeats for the signed-in user.
#[derive(Debug)]
pub struct HeartbeatPublisher {
    inner: Arc<Inner>,
}

impl HeartbeatPublisher {
    /// Create a publisher. Nothing is scheduled until [`start`](Self::start).
    ///
    /// A zero `interval` falls back to [`DEFAULT_HEARTBEAT_INTERVAL`].
    pub fn new(
        store: Arc<dyn SessionStore>,
        scheduler: Arc<dyn Scheduler>,
        interval: Duration,
        client_info: impl Into<String>,
    ) -> Self {
        let interval = if interval.is_zero() {
            tracing::warn!(
                fallback_secs = DEFAULT_HEARTBEAT_INTERVAL.as_secs(),
                "Zero heartbeat interval, using default"
            );
            DEFAULT_HEARTBEAT_INTERVAL
        } else {
            interval
        };

        Self {
            inner: Arc::new(Inner {
                store,
                scheduler,
                interval,
                client_info: client_info.into(),
                handle: Mutex::new(None),
            }),
        }
    }

    /// Beat immediately, then every interval. No-op while running.
    pub fn start(&self) {
        let mut handle = self.inner.lock();
        if handle.is_some() {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let task: TaskFn = Arc::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    inner.beat().await;
                }
            }
            .boxed()
        });
        *handle = Some(
            self.inner
                .scheduler
                .every("heartbeat", self.inner.interval, true, task),
        );
        tracing::debug!(
            interval_secs = self.inner.interval.as_secs(),
            "Heartbeat publisher started"
        );
    }

    /// Cancel heartbeats. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = self.inner.lock().take() {
            handle.cancel();
            tracing::debug!("Heartbeat publisher stopped");
        }
    }

    /// Whether heartbeats are scheduled.
    pub fn is_running(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Publish one heartbeat now.
    pub async fn beat_once(&self) -> HeartbeatOutcome {
        self.inner.beat().await
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Option<TaskHandle>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn beat(&self) -> HeartbeatOutcome {
        let session = match self.store.current_session().await {
            Ok(Some(session)) if session.valid => session,
            Ok(_) => return HeartbeatOutcome::Skipped,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed, heartbeat skipped");
                return HeartbeatOutcome::Failed;
            }
        };

        let at = Utc::now();
        match self
            .store
            .upsert_liveness(session.user_id, at, &self.client_info)
            .await
        {
            Ok(()) => {
                tracing::trace!(user_id = %session.user_id, "Heartbeat published");
                HeartbeatOutcome::Published { at }
            }
            Err(e) => {
                tracing::warn!(user_id = %session.user_id, error = %e, "Heartbeat failed");
                HeartbeatOutcome::Failed
            }
        }
    }
}
