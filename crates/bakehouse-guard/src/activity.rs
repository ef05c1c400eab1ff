//! Qualifying user input and the throttle that decides which input counts.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;

/// User input that counts as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    /// Pointer press.
    PointerPress,
    /// Pointer movement.
    PointerMove,
    /// Key press.
    KeyPress,
    /// Scrolling.
    Scroll,
    /// Touch start.
    TouchStart,
}

impl ActivityKind {
    /// Every qualifying kind.
    pub const ALL: [ActivityKind; 5] = [
        Self::PointerPress,
        Self::PointerMove,
        Self::KeyPress,
        Self::Scroll,
        Self::TouchStart,
    ];

    /// DOM event name this kind is fed from.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::PointerPress => "mousedown",
            Self::PointerMove => "mousemove",
            Self::KeyPress => "keydown",
            Self::Scroll => "scroll",
            Self::TouchStart => "touchstart",
        }
    }

    /// Map a DOM event name to a kind. Non-qualifying events return `None`.
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.event_name() == name)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_event_name(s).ok_or_else(|| format!("Not a qualifying activity event: {s}"))
    }
}

/// Throttles activity so the inactivity deadline is not rearmed on every
/// pointer move.
///
/// An observation within `throttle` of the last accepted one is dropped.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    throttle: Duration,
    last_accepted: Option<Instant>,
}

impl ActivityTracker {
    /// Create a tracker with no accepted activity yet.
    pub fn new(throttle: Duration) -> Self {
        Self {
            throttle,
            last_accepted: None,
        }
    }

    /// Treat `now` as accepted activity regardless of the throttle.
    pub fn reset(&mut self, now: Instant) {
        self.last_accepted = Some(now);
    }

    /// Record an observation at `now`. Returns `true` if it was accepted.
    pub fn observe(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.saturating_duration_since(last) < self.throttle => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    /// Time of the last accepted observation.
    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    /// The throttle window.
    pub fn throttle(&self) -> Duration {
        self.throttle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_round_trip() {
        for kind in ActivityKind::ALL {
            assert_eq!(ActivityKind::from_event_name(kind.event_name()), Some(kind));
        }
        assert_eq!(ActivityKind::from_event_name("focus"), None);
        assert!("wheel".parse::<ActivityKind>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_window() {
        let mut tracker = ActivityTracker::new(Duration::from_secs(5));
        let t0 = Instant::now();

        assert!(tracker.observe(t0));
        assert!(!tracker.observe(t0 + Duration::from_secs(3)));
        assert!(!tracker.observe(t0 + Duration::from_millis(4999)));
        assert!(tracker.observe(t0 + Duration::from_secs(5)));
        assert_eq!(tracker.last_accepted(), Some(t0 + Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_counts_as_accepted() {
        let mut tracker = ActivityTracker::new(Duration::from_secs(5));
        let t0 = Instant::now();

        tracker.reset(t0);
        assert!(!tracker.observe(t0 + Duration::from_secs(1)));
    }
}
