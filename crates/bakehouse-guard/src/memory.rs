//! In-memory session store.
//!
//! Used by the terminal host in offline demo mode and by tests. Mirrors the
//! semantics of the Postgres store: one liveness row per user, last writer
//! wins, and sign-out invalidates the held session.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use bakehouse_core::error::AppError;
use bakehouse_core::result::AppResult;
use bakehouse_core::traits::SessionStore;
use bakehouse_core::types::{Session, UserId};

/// A stored liveness row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessRow {
    /// Time of the latest heartbeat.
    pub last_seen_at: DateTime<Utc>,
    /// Client identifier sent with the latest heartbeat.
    pub user_agent: String,
}

/// Snapshot of how often each store operation was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    /// `current_session` calls.
    pub current_session: usize,
    /// `sign_out` calls.
    pub sign_out: usize,
    /// `profile_active_flag` calls.
    pub profile_active_flag: usize,
    /// `upsert_liveness` calls.
    pub upsert_liveness: usize,
}

impl StoreCalls {
    /// Sum of all calls.
    pub fn total(&self) -> usize {
        self.current_session + self.sign_out + self.profile_active_flag + self.upsert_liveness
    }
}

#[derive(Debug, Default)]
struct Counters {
    current_session: AtomicUsize,
    sign_out: AtomicUsize,
    profile_active_flag: AtomicUsize,
    upsert_liveness: AtomicUsize,
}

/// [`SessionStore`] held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
    profiles: DashMap<UserId, bool>,
    liveness: DashMap<UserId, LivenessRow>,
    outage: AtomicBool,
    counters: Counters,
}

impl MemorySessionStore {
    /// Create an empty store with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign `user_id` in with an active profile.
    pub fn signed_in(user_id: UserId) -> Self {
        let store = Self::new();
        store.set_session(Some(Session::active(user_id)));
        store.set_profile_active(user_id, Some(true));
        store
    }

    /// Replace the current session.
    pub fn set_session(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// The current session, without counting a call.
    pub fn session(&self) -> Option<Session> {
        *self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set or clear a user's `active` flag.
    pub fn set_profile_active(&self, user_id: UserId, active: Option<bool>) {
        match active {
            Some(active) => {
                self.profiles.insert(user_id, active);
            }
            None => {
                self.profiles.remove(&user_id);
            }
        }
    }

    /// Make every operation fail until switched off again.
    pub fn set_outage(&self, outage: bool) {
        self.outage.store(outage, Ordering::SeqCst);
    }

    /// Liveness row for a user.
    pub fn liveness(&self, user_id: UserId) -> Option<LivenessRow> {
        self.liveness.get(&user_id).map(|r| r.value().clone())
    }

    /// Number of stored liveness rows.
    pub fn liveness_count(&self) -> usize {
        self.liveness.len()
    }

    /// Call counts so far.
    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            current_session: self.counters.current_session.load(Ordering::SeqCst),
            sign_out: self.counters.sign_out.load(Ordering::SeqCst),
            profile_active_flag: self.counters.profile_active_flag.load(Ordering::SeqCst),
            upsert_liveness: self.counters.upsert_liveness.load(Ordering::SeqCst),
        }
    }

    fn check_available(&self) -> AppResult<()> {
        if self.outage.load(Ordering::SeqCst) {
            return Err(AppError::service_unavailable("Session store unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn current_session(&self) -> AppResult<Option<Session>> {
        self.counters.current_session.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.session().filter(|s| s.valid))
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.counters.sign_out.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.set_session(None);
        Ok(())
    }

    async fn profile_active_flag(&self, user_id: UserId) -> Option<bool> {
        self.counters
            .profile_active_flag
            .fetch_add(1, Ordering::SeqCst);
        if self.outage.load(Ordering::SeqCst) {
            return None;
        }
        self.profiles.get(&user_id).map(|r| *r.value())
    }

    async fn upsert_liveness(
        &self,
        user_id: UserId,
        at: DateTime<Utc>,
        client_info: &str,
    ) -> AppResult<()> {
        self.counters.upsert_liveness.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.liveness.insert(
            user_id,
            LivenessRow {
                last_seen_at: at,
                user_agent: client_info.to_string(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_user() {
        let user = UserId::new();
        let store = MemorySessionStore::signed_in(user);
        let first = Utc::now();
        let second = first + Duration::minutes(5);

        store.upsert_liveness(user, first, "till-1").await.unwrap();
        store.upsert_liveness(user, second, "till-2").await.unwrap();

        assert_eq!(store.liveness_count(), 1);
        let row = store.liveness(user).unwrap();
        assert_eq!(row.last_seen_at, second);
        assert_eq!(row.user_agent, "till-2");
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let store = MemorySessionStore::signed_in(UserId::new());
        store.sign_out().await.unwrap();
        assert!(store.current_session().await.unwrap().is_none());
        assert_eq!(store.calls().sign_out, 1);
    }

    #[tokio::test]
    async fn test_invalid_session_reads_as_absent() {
        let store = MemorySessionStore::new();
        store.set_session(Some(Session {
            user_id: UserId::new(),
            valid: false,
        }));
        assert!(store.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_outage_fails_every_operation() {
        let user = UserId::new();
        let store = MemorySessionStore::signed_in(user);
        store.set_outage(true);

        assert!(store.current_session().await.is_err());
        assert!(store.sign_out().await.is_err());
        assert_eq!(store.profile_active_flag(user).await, None);
        assert!(store.upsert_liveness(user, Utc::now(), "x").await.is_err());
        assert_eq!(store.calls().total(), 4);
        assert!(store.session().is_some());
    }
}
