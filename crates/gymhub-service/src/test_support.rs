//! In-process fakes for the transport and live connector.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::{Notify, mpsc};
use tokio_util::sync::CancellationToken;

use gymhub_client::transport::NotificationTransport;
use gymhub_core::config::notifications::NotificationsConfig;
use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::types::id::{NotificationId, UserId};
use gymhub_entity::notification::{NewNotification, Notification};
use gymhub_realtime::connection::subscription::LiveSubscription;
use gymhub_realtime::connector::LiveConnector;

use crate::store::NotificationStore;

/// A notification for `user` with a deterministic timestamp.
pub fn notification(id: &str, user: &str) -> Notification {
    let created_at = Utc
        .with_ymd_and_hms(2026, 1, 5, 10, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    Notification::new(id, user, "payment", format!("Title {id}"), "Body", created_at)
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    snapshots: Mutex<HashMap<UserId, Vec<Notification>>>,
    gates: Mutex<HashMap<UserId, Arc<Notify>>>,
    fail_fetch: AtomicBool,
    fail_mark_read: AtomicBool,
    pub fetch_calls: AtomicUsize,
    pub mark_read_calls: Mutex<Vec<(UserId, NotificationId)>>,
}

impl FakeTransport {
    pub fn with_snapshot(self, user: &str, snapshot: Vec<Notification>) -> Self {
        self.set_snapshot(user, snapshot);
        self
    }

    pub fn set_snapshot(&self, user: &str, snapshot: Vec<Notification>) {
        self.snapshots
            .lock()
            .unwrap()
            .insert(UserId::new(user), snapshot);
    }

    pub fn failing_fetch(self) -> Self {
        self.fail_fetch.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_mark_read(self) -> Self {
        self.fail_mark_read.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Hold fetches for `user` until the returned `Notify` fires.
    pub fn gate(&self, user: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(UserId::new(user), Arc::clone(&gate));
        gate
    }

    pub fn mark_read_count(&self) -> usize {
        self.mark_read_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationTransport for FakeTransport {
    async fn fetch_for_user(&self, user_id: &UserId) -> AppResult<Vec<Notification>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(user_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::server(500, "fetch exploded"));
        }
        Ok(self
            .snapshots
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
    ) -> AppResult<Option<Notification>> {
        self.mark_read_calls
            .lock()
            .unwrap()
            .push((user_id.clone(), id.clone()));
        if self.fail_mark_read.load(Ordering::SeqCst) {
            return Err(AppError::network("connection reset"));
        }
        Ok(None)
    }

    async fn create(&self, _payload: &NewNotification) -> AppResult<Notification> {
        Err(AppError::internal("not used by the store"))
    }
}

#[derive(Debug)]
pub struct FakeConnector {
    refuse: bool,
    opened: Mutex<Vec<(UserId, mpsc::Sender<Notification>, CancellationToken)>>,
}

impl FakeConnector {
    pub fn accepting() -> Self {
        Self {
            refuse: false,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn connects(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    /// Sender feeding the `index`-th opened subscription.
    pub fn sender(&self, index: usize) -> mpsc::Sender<Notification> {
        self.opened.lock().unwrap()[index].1.clone()
    }

    /// Close token of the `index`-th opened subscription.
    pub fn close_handle(&self, index: usize) -> CancellationToken {
        self.opened.lock().unwrap()[index].2.clone()
    }
}

#[async_trait]
impl LiveConnector for FakeConnector {
    async fn connect(&self, user_id: &UserId) -> AppResult<LiveSubscription> {
        if self.refuse {
            return Err(AppError::channel_unavailable("socket refused"));
        }
        let (tx, rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        self.opened
            .lock()
            .unwrap()
            .push((user_id.clone(), tx, cancel.clone()));
        Ok(LiveSubscription::new(user_id.clone(), rx, cancel, None))
    }
}

pub fn store_with(
    transport: Arc<FakeTransport>,
    connector: Arc<FakeConnector>,
) -> NotificationStore {
    NotificationStore::builder()
        .transport(transport)
        .connector(connector)
        .config(NotificationsConfig::default())
        .build()
        .unwrap()
}

/// Poll until `check` holds, yielding to spawned tasks in between.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
