//! Cancellable timer capability shared by the guard components.
//!
//! Components never touch `tokio::time` directly; they ask a
//! [`Scheduler`] for one-shot or periodic tasks and hold the returned
//! [`TaskHandle`]. Dropping or cancelling the handle stops the task,
//! including one that is mid-flight.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// A repeatable unit of work run on every tick of a periodic task.
pub type TaskFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Source of time and timers for the guard components.
pub trait Scheduler: Send + Sync + fmt::Debug + 'static {
    /// Current monotonic time.
    fn now(&self) -> Instant;

    /// Run `task` every `period`. The first run happens immediately when
    /// `immediate` is set, otherwise one period from now.
    ///
    /// A zero `period` schedules nothing and returns a cancelled handle.
    fn every(
        &self,
        name: &'static str,
        period: Duration,
        immediate: bool,
        task: TaskFn,
    ) -> TaskHandle;

    /// Run `task` once after `delay`.
    fn after(
        &self,
        name: &'static str,
        delay: Duration,
        task: BoxFuture<'static, ()>,
    ) -> TaskHandle;
}

/// Owner of a scheduled task. The task stops when the handle is cancelled
/// or dropped.
pub struct TaskHandle {
    name: &'static str,
    token: CancellationToken,
}

impl TaskHandle {
    /// Wrap a cancellation token as a task handle.
    pub fn new(name: &'static str, token: CancellationToken) -> Self {
        Self { name, token }
    }

    /// Task name used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the task. Idempotent.
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::trace!(task = self.name, "Cancelling scheduled task");
            self.token.cancel();
        }
    }

    /// Whether the task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("name", &self.name)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// [`Scheduler`] backed by tokio timers on the current runtime.
///
/// Under `#[tokio::test(start_paused = true)]` the same implementation
/// runs on tokio's virtual clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Create a scheduler bound to the ambient tokio runtime.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn every(
        &self,
        name: &'static str,
        period: Duration,
        immediate: bool,
        task: TaskFn,
    ) -> TaskHandle {
        let token = CancellationToken::new();
        if period.is_zero() {
            tracing::warn!(task = name, "Refusing to schedule periodic task with zero period");
            token.cancel();
            return TaskHandle::new(name, token);
        }

        let cancel = token.clone();
        let start = if immediate {
            Instant::now()
        } else {
            Instant::now() + period
        };

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = task() => {}
                }
            }

            tracing::trace!(task = name, "Periodic task stopped");
        });

        TaskHandle::new(name, token)
    }

    fn after(
        &self,
        name: &'static str,
        delay: Duration,
        task: BoxFuture<'static, ()>,
    ) -> TaskHandle {
        let token = CancellationToken::new();
        let cancel = token.clone();
        let deadline = Instant::now() + delay;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep_until(deadline) => {}
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = task => {}
            }
            tracing::trace!(task = name, "One-shot task finished");
        });

        TaskHandle::new(name, token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;

    use super::*;

    fn counting_task(counter: &Arc<AtomicUsize>) -> TaskFn {
        let counter = Arc::clone(counter);
        Arc::new(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_immediate_runs_at_start_then_each_period() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = TokioScheduler::new().every(
            "test",
            Duration::from_secs(10),
            true,
            counting_task(&counter),
        );

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 4);

        drop(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_delayed_waits_one_period() {
        let counter = Arc::new(AtomicUsize::new(0));
        let _handle = TokioScheduler::new().every(
            "test",
            Duration::from_secs(10),
            false,
            counting_task(&counter),
        );

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_stops_periodic_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = TokioScheduler::new().every(
            "test",
            Duration::from_secs(1),
            true,
            counting_task(&counter),
        );

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_schedules_nothing() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle =
            TokioScheduler::new().every("test", Duration::ZERO, true, counting_task(&counter));
        assert!(handle.is_cancelled());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_fires_once_unless_cancelled() {
        let fired = Arc::new(AtomicUsize::new(0));
        let scheduler = TokioScheduler::new();

        let counter = Arc::clone(&fired);
        let _kept = scheduler.after(
            "kept",
            Duration::from_secs(5),
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed(),
        );

        let counter = Arc::clone(&fired);
        let cancelled = scheduler.after(
            "cancelled",
            Duration::from_secs(5),
            async move {
                counter.fetch_add(10, Ordering::SeqCst);
            }
            .boxed(),
        );
        cancelled.cancel();
        assert!(cancelled.is_cancelled());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
