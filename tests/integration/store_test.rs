//! End-to-end tests for the notification store over HTTP and WebSocket.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use gymhub_auth::session::MemorySessionProvider;
use gymhub_client::NotificationTransport;
use gymhub_core::config::notifications::NotificationsConfig;
use gymhub_core::config::realtime::RealtimeConfig;
use gymhub_core::types::id::{NotificationId, UserId};
use gymhub_entity::notification::NewNotification;
use gymhub_entity::user::{Session, UserRole};
use gymhub_realtime::WsLiveConnector;
use gymhub_service::{LiveStatus, MarkReadOutcome, NotificationBell, NotificationStore};

use crate::helpers::{MockBackend, eventually, notification_json};

#[tokio::test]
async fn test_snapshot_then_live_push() {
    let backend = MockBackend::start().await;
    backend.seed(
        "u1",
        vec![
            notification_json("b", "u1", "payment", false),
            notification_json("a", "u1", "expiry", true),
        ],
    );
    let store = backend.store();

    store.initialize(&UserId::new("u1")).await;

    assert_eq!(store.unread_count(), 1);
    assert_eq!(store.status().live, LiveStatus::Connected);
    eventually(|| backend.subscription_count() == 1).await;
    assert_eq!(
        backend.state.subscriptions.lock().unwrap()[0],
        "notifications:u1"
    );

    backend.push("u1", notification_json("c", "u1", "membership", false));
    eventually(|| store.unread_count() == 2).await;
    assert_eq!(store.notifications()[0].id.as_str(), "c");
}

#[tokio::test]
async fn test_created_notification_arrives_live() {
    let backend = MockBackend::start().await;
    let store = backend.store();
    store.initialize(&UserId::new("u2")).await;
    eventually(|| backend.subscription_count() == 1).await;

    let created = backend
        .client()
        .create(&NewNotification {
            user_id: "u2".to_string(),
            title: "Payment received".to_string(),
            message: "Thanks".to_string(),
            kind: "payment".to_string(),
            redirect_url: None,
        })
        .await
        .unwrap();

    eventually(|| store.notifications().len() == 1).await;
    assert_eq!(store.notifications()[0].id, created.id);
}

#[tokio::test]
async fn test_other_users_pushes_are_not_delivered() {
    let backend = MockBackend::start().await;
    let store = backend.store();
    store.initialize(&UserId::new("u1")).await;
    eventually(|| backend.subscription_count() == 1).await;

    backend.push("u2", notification_json("x", "u2", "payment", false));
    backend.push("u1", notification_json("y", "u1", "payment", false));

    eventually(|| store.unread_count() == 1).await;
    assert_eq!(store.notifications()[0].id.as_str(), "y");
}

#[tokio::test]
async fn test_malformed_frames_are_skipped() {
    let backend = MockBackend::start().await;
    let store = backend.store();
    store.initialize(&UserId::new("u1")).await;
    eventually(|| backend.subscription_count() == 1).await;

    backend.push_raw("u1", "not json");
    backend.push_raw("u1", r#"{"type":"member_checked_in","member":"u9"}"#);
    backend.push_raw("u1", r#"{"type":"ping","timestamp":42}"#);
    backend.push("u1", notification_json("ok", "u1", "payment", false));

    eventually(|| store.unread_count() == 1).await;
    eventually(|| backend.state.pongs.load(Ordering::SeqCst) == 1).await;
    assert_eq!(store.status().live, LiveStatus::Connected);
}

#[tokio::test]
async fn test_live_window_is_bounded() {
    let backend = MockBackend::start().await;
    let store = backend.store();
    store.initialize(&UserId::new("u1")).await;
    eventually(|| backend.subscription_count() == 1).await;

    for i in 0..25 {
        backend.push("u1", notification_json(&format!("e{i}"), "u1", "payment", false));
    }

    eventually(|| {
        store
            .first(1)
            .first()
            .is_some_and(|n| n.id.as_str() == "e24")
    })
    .await;
    let held = store.notifications();
    assert_eq!(held.len(), 20);
    assert_eq!(held[19].id.as_str(), "e5");

    let bell = NotificationBell::new(store);
    assert_eq!(bell.visible().len(), 10);
    assert_eq!(bell.badge().as_deref(), Some("20"));
}

#[tokio::test]
async fn test_mark_read_confirmed_and_unconfirmed() {
    let backend = MockBackend::start().await;
    backend.seed(
        "u1",
        vec![
            notification_json("a", "u1", "payment", false),
            notification_json("b", "u1", "payment", false),
        ],
    );
    let store = backend.store();
    store.initialize(&UserId::new("u1")).await;

    let confirmed = store.mark_read(&NotificationId::new("a")).await;
    backend.state.fail_mark_read.store(true, Ordering::SeqCst);
    let unconfirmed = store.mark_read(&NotificationId::new("b")).await;

    assert_eq!(confirmed, MarkReadOutcome::Confirmed { changed: true });
    assert_eq!(unconfirmed, MarkReadOutcome::LocalOnly { changed: true });
    assert_eq!(store.unread_count(), 0);
    assert_eq!(
        backend.mark_read_calls(),
        vec![
            ("u1".to_string(), "a".to_string()),
            ("u1".to_string(), "b".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_fetch_failure_still_receives_live_events() {
    let backend = MockBackend::start().await;
    backend.state.fail_fetch.store(true, Ordering::SeqCst);
    let store = backend.store();

    store.initialize(&UserId::new("u1")).await;
    assert!(store.notifications().is_empty());
    assert!(store.status().fetch_failed);

    eventually(|| backend.subscription_count() == 1).await;
    backend.push("u1", notification_json("live", "u1", "payment", false));
    eventually(|| store.unread_count() == 1).await;
}

#[tokio::test]
async fn test_unreachable_live_channel_falls_back_to_fetch_only() {
    let backend = MockBackend::start().await;
    backend.seed("u1", vec![notification_json("a", "u1", "payment", false)]);
    let store = NotificationStore::builder()
        .transport(Arc::new(backend.client()))
        .connector(Arc::new(WsLiveConnector::new(&RealtimeConfig {
            enabled: true,
            url: "ws://127.0.0.1:9/ws".to_string(),
            connect_timeout_seconds: 1,
            channel_buffer_size: 4,
        })))
        .config(NotificationsConfig::default())
        .build()
        .unwrap();

    store.initialize(&UserId::new("u1")).await;

    assert_eq!(store.unread_count(), 1);
    assert_eq!(store.status().live, LiveStatus::Unavailable);
}

#[tokio::test]
async fn test_teardown_closes_socket() {
    let backend = MockBackend::start().await;
    let store = backend.store();
    store.initialize(&UserId::new("u1")).await;
    eventually(|| backend.subscription_count() == 1).await;

    store.teardown();

    eventually(|| backend.state.closed_sockets.load(Ordering::SeqCst) == 1).await;
    assert!(store.notifications().is_empty());
}

#[tokio::test]
async fn test_session_switch_resubscribes() {
    let backend = MockBackend::start().await;
    backend.seed("m1", vec![notification_json("a", "m1", "payment", false)]);
    backend.seed("m2", vec![notification_json("z", "m2", "expiry", false)]);
    let store = backend.store();
    let sessions = MemorySessionProvider::new();

    sessions.login(Session::new("m1", UserRole::Member));
    store.initialize_from_session(&sessions).await;
    eventually(|| backend.subscription_count() == 1).await;

    sessions.login(Session::new("m2", UserRole::Member));
    store.initialize_from_session(&sessions).await;
    eventually(|| backend.subscription_count() == 2).await;
    eventually(|| backend.state.closed_sockets.load(Ordering::SeqCst) == 1).await;

    backend.push("m1", notification_json("stale", "m1", "payment", false));
    backend.push("m2", notification_json("fresh", "m2", "payment", false));
    eventually(|| store.notifications().len() == 2).await;
    let ids: Vec<String> = store.notifications().iter().map(|n| n.id.to_string()).collect();
    assert_eq!(ids, vec!["fresh", "z"]);

    sessions.logout();
    store.initialize_from_session(&sessions).await;
    assert!(store.user_id().is_none());
}
