//! Postgres-backed tests. Skipped unless `DATABASE_URL` is set.

use std::sync::Arc;

use chrono::{Duration, SubsecRound, Utc};

use bakehouse_auth::{DatabaseSessionStore, SessionIssuer, SessionResolver};
use bakehouse_core::config::{AuthConfig, DatabaseConfig};
use bakehouse_core::error::ErrorKind;
use bakehouse_core::traits::SessionStore;
use bakehouse_core::types::UserId;
use bakehouse_database::DatabasePool;
use bakehouse_database::repositories::{
    AuthSessionRepository, LivenessRepository, ProfileRepository,
};
use bakehouse_entity::profile::{CreateProfile, Profile, UserRole};
use bakehouse_guard::{
    AccountActivePoller, ChannelNavigator, HeartbeatOutcome, HeartbeatPublisher, PollOutcome,
    TokioScheduler,
};

struct Db {
    profiles: Arc<ProfileRepository>,
    sessions: Arc<AuthSessionRepository>,
    liveness: Arc<LivenessRepository>,
}

impl Db {
    async fn connect() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping");
            return None;
        };
        let config = DatabaseConfig {
            url,
            max_connections: 4,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 60,
        };
        let db = DatabasePool::connect(&config).await.expect("connect");
        bakehouse_database::migration::run_migrations(db.pool())
            .await
            .expect("migrations");

        let pool = db.into_pool();
        Some(Self {
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
            sessions: Arc::new(AuthSessionRepository::new(pool.clone())),
            liveness: Arc::new(LivenessRepository::new(pool)),
        })
    }

    async fn profile(&self, role: UserRole) -> Profile {
        self.profiles
            .create(&CreateProfile {
                id: None,
                display_name: "Counter staff".to_string(),
                role,
            })
            .await
            .expect("create profile")
    }

    async fn signed_in_store(&self, profile: &Profile) -> DatabaseSessionStore {
        let issued = SessionIssuer::new(Arc::clone(&self.sessions), AuthConfig::default())
            .issue(UserId::from_uuid(profile.id), Some("till-1"))
            .await
            .expect("issue session");

        DatabaseSessionStore::new(
            Arc::clone(&self.sessions),
            Arc::clone(&self.profiles),
            Arc::clone(&self.liveness),
        )
        .with_token(issued.token)
    }
}

#[tokio::test]
async fn liveness_upsert_keeps_one_row_with_latest_timestamp() {
    let Some(db) = Db::connect().await else { return };
    let profile = db.profile(UserRole::Staff).await;
    let first = Utc::now().trunc_subsecs(6);
    let second = first + Duration::minutes(5);

    db.liveness.upsert(profile.id, first, "till-1").await.unwrap();
    db.liveness.upsert(profile.id, second, "till-2").await.unwrap();

    let row = db.liveness.find_by_user(profile.id).await.unwrap().unwrap();
    assert_eq!(row.last_seen_at, second);
    assert_eq!(row.user_agent.as_deref(), Some("till-2"));

    let online = db.liveness.find_seen_since(first).await.unwrap();
    assert_eq!(online.iter().filter(|u| u.user_id == profile.id).count(), 1);
}

#[tokio::test]
async fn store_resolves_session_and_signs_out() {
    let Some(db) = Db::connect().await else { return };
    let profile = db.profile(UserRole::Staff).await;
    let store = db.signed_in_store(&profile).await;

    let session = store.current_session().await.unwrap().expect("signed in");
    assert_eq!(session.user_id.into_uuid(), profile.id);
    assert_eq!(store.profile_active_flag(session.user_id).await, Some(true));

    store.sign_out().await.unwrap();
    assert!(store.current_session().await.unwrap().is_none());
    assert_eq!(db.sessions.count_active_by_user(profile.id).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_profile_reads_as_none() {
    let Some(db) = Db::connect().await else { return };
    let profile = db.profile(UserRole::Staff).await;
    let store = db.signed_in_store(&profile).await;

    assert_eq!(store.profile_active_flag(UserId::new()).await, None);
}

#[tokio::test]
async fn deactivated_account_is_logged_out_by_poller() {
    let Some(db) = Db::connect().await else { return };
    let profile = db.profile(UserRole::Staff).await;
    let store = Arc::new(db.signed_in_store(&profile).await);
    let (navigator, mut redirects) = ChannelNavigator::new();
    let poller = AccountActivePoller::new(
        store.clone(),
        Arc::new(navigator),
        Arc::new(TokioScheduler::new()),
        std::time::Duration::from_secs(60),
    );

    assert_eq!(poller.check_once().await, PollOutcome::Active);

    db.profiles.set_active(profile.id, false).await.unwrap();
    assert_eq!(poller.check_once().await, PollOutcome::Deactivated);
    assert_eq!(
        redirects.try_recv().ok().map(|r| r.to_url()).as_deref(),
        Some("/login?reason=deactivated")
    );
    assert_eq!(poller.check_once().await, PollOutcome::NoSession);
}

#[tokio::test]
async fn heartbeat_publisher_writes_liveness_row() {
    let Some(db) = Db::connect().await else { return };
    let profile = db.profile(UserRole::Staff).await;
    let store = Arc::new(db.signed_in_store(&profile).await);
    let publisher = HeartbeatPublisher::new(
        store,
        Arc::new(TokioScheduler::new()),
        std::time::Duration::from_secs(300),
        "till-3",
    );

    let HeartbeatOutcome::Published { .. } = publisher.beat_once().await else {
        panic!("heartbeat should publish");
    };
    let row = db.liveness.find_by_user(profile.id).await.unwrap().unwrap();
    assert_eq!(row.user_agent.as_deref(), Some("till-3"));
}

#[tokio::test]
async fn resolver_rejects_deactivated_profile() {
    let Some(db) = Db::connect().await else { return };
    let profile = db.profile(UserRole::Admin).await;
    let issued = SessionIssuer::new(Arc::clone(&db.sessions), AuthConfig::default())
        .issue(UserId::from_uuid(profile.id), None)
        .await
        .unwrap();
    let resolver = SessionResolver::new(Arc::clone(&db.sessions), Arc::clone(&db.profiles));

    let user = resolver.resolve(&issued.token).await.unwrap();
    assert_eq!(user.role, UserRole::Admin);

    db.profiles.set_active(profile.id, false).await.unwrap();
    let err = resolver.resolve(&issued.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert!(resolver.resolve_session(&issued.token).await.is_ok());

    let err = resolver.resolve("not-a-token").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}
