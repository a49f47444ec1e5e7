//! `NotificationStore`: the single owner of the current user's notifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gymhub_auth::session::SessionProvider;
use gymhub_client::transport::NotificationTransport;
use gymhub_core::config::notifications::NotificationsConfig;
use gymhub_core::result::AppResult;
use gymhub_core::types::id::{NotificationId, UserId};
use gymhub_entity::notification::Notification;
use gymhub_realtime::connection::subscription::LiveSubscription;
use gymhub_realtime::connector::LiveConnector;

use super::builder::NotificationStoreBuilder;
use super::state::{Degradation, LiveMerge, LiveStatus, StoreState};

/// What happened to a mark-read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// Applied locally and accepted by the backend.
    Confirmed {
        /// Whether a held entry went from unread to read.
        changed: bool,
    },
    /// Applied locally; the backend call failed and was not retried.
    LocalOnly {
        /// Whether a held entry went from unread to read.
        changed: bool,
    },
    /// No active session, nothing done.
    NoSession,
}

impl MarkReadOutcome {
    /// Whether a held entry went from unread to read.
    pub fn changed(&self) -> bool {
        match self {
            Self::Confirmed { changed } | Self::LocalOnly { changed } => *changed,
            Self::NoSession => false,
        }
    }
}

/// Live channel owned by the current session.
#[derive(Debug)]
struct LiveHandle {
    close: CancellationToken,
    listener: JoinHandle<()>,
}

impl LiveHandle {
    fn close(self) {
        self.close.cancel();
        self.listener.abort();
    }
}

#[derive(Debug)]
struct StoreInner {
    transport: Arc<dyn NotificationTransport>,
    connector: Arc<dyn LiveConnector>,
    config: NotificationsConfig,
    state: RwLock<StoreState>,
    /// Bumped on every session change; async completions carrying an older
    /// value are discarded.
    epoch: AtomicU64,
    live: Mutex<Option<LiveHandle>>,
    changes: watch::Sender<u64>,
}

/// Holds the signed-in user's notifications and mediates between the REST
/// transport, the live channel, and presentation.
///
/// Cloning is cheap; clones share the same state.
#[derive(Debug, Clone)]
pub struct NotificationStore {
    inner: Arc<StoreInner>,
}

impl NotificationStore {
    /// Start building a store.
    pub fn builder() -> NotificationStoreBuilder {
        NotificationStoreBuilder::new()
    }

    pub(crate) fn from_parts(
        transport: Arc<dyn NotificationTransport>,
        connector: Arc<dyn LiveConnector>,
        config: NotificationsConfig,
    ) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                transport,
                connector,
                config,
                state: RwLock::new(StoreState::default()),
                epoch: AtomicU64::new(0),
                live: Mutex::new(None),
                changes,
            }),
        }
    }

    /// Start a session for `user_id`.
    ///
    /// A blank id is a no-op. Otherwise any previous session is torn down,
    /// then the snapshot fetch and the live channel connect run
    /// concurrently; each applies its own result as soon as it completes.
    /// Neither failure propagates: a failed fetch leaves the list empty, a
    /// failed connect leaves the store in fetch-only mode.
    pub async fn initialize(&self, user_id: &UserId) {
        if user_id.is_blank() {
            debug!("Skipping notification store init: no user");
            return;
        }

        let epoch = self.inner.begin_session(user_id);
        info!(user_id = %user_id, epoch, "Initializing notification store");

        let fetch = async {
            let result = self.inner.transport.fetch_for_user(user_id).await;
            self.inner.apply_snapshot(epoch, result);
        };
        let live = async {
            let result = self.inner.connector.connect(user_id).await;
            StoreInner::attach_live(&self.inner, epoch, result);
        };
        tokio::join!(fetch, live);
    }

    /// Initialize from whatever session `sessions` currently holds, or tear
    /// down if signed out.
    pub async fn initialize_from_session(&self, sessions: &dyn SessionProvider) {
        match sessions.current_user_id() {
            Some(user_id) => self.initialize(&user_id).await,
            None => self.teardown(),
        }
    }

    /// Re-run the snapshot fetch for the current user.
    pub async fn refresh(&self) {
        let Some((user_id, epoch)) = self.inner.current_session() else {
            return;
        };
        let result = self.inner.transport.fetch_for_user(&user_id).await;
        self.inner.apply_snapshot(epoch, result);
    }

    /// Merge one live event into the current session.
    pub fn on_live_event(&self, event: Notification) {
        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        self.inner.merge_live(epoch, event);
    }

    /// Mark one notification read.
    ///
    /// The local entry is updated before the backend is called, and stays
    /// read whatever the backend says.
    pub async fn mark_read(&self, id: &NotificationId) -> MarkReadOutcome {
        let (user_id, changed) = {
            let mut state = self.inner.write_state();
            let Some(user_id) = state.user_id.clone() else {
                return MarkReadOutcome::NoSession;
            };
            let changed = state.mark_read(id).unwrap_or(false);
            (user_id, changed)
        };
        if changed {
            self.inner.notify();
        }

        match self.inner.transport.mark_read(&user_id, id).await {
            Ok(_) => MarkReadOutcome::Confirmed { changed },
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    notification_id = %id,
                    error = %e,
                    "Mark-read failed on backend; keeping local state"
                );
                MarkReadOutcome::LocalOnly { changed }
            }
        }
    }

    /// End the current session: close the live channel if one was opened,
    /// discard in-flight results, and clear state.
    pub fn teardown(&self) {
        let previous = self.inner.read_state().user_id.clone();
        self.inner.end_session();
        if let Some(user_id) = previous {
            info!(user_id = %user_id, "Notification store torn down");
        }
    }

    /// Number of unread notifications, recomputed on every call.
    pub fn unread_count(&self) -> usize {
        self.inner.read_state().unread_count()
    }

    /// Copy of the current list, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.read_state().notifications.clone()
    }

    /// First `n` notifications, newest first.
    pub fn first(&self, n: usize) -> Vec<Notification> {
        self.inner
            .read_state()
            .notifications
            .iter()
            .take(n)
            .cloned()
            .collect()
    }

    /// User of the current session.
    pub fn user_id(&self) -> Option<UserId> {
        self.inner.read_state().user_id.clone()
    }

    /// Degradation flags for the current session.
    pub fn status(&self) -> Degradation {
        self.inner.read_state().degradation
    }

    /// Whether a snapshot has landed in the current session.
    pub fn snapshot_loaded(&self) -> bool {
        self.inner.read_state().snapshot_loaded
    }

    /// Retention and display settings.
    pub fn config(&self) -> &NotificationsConfig {
        &self.inner.config
    }

    /// Receiver that ticks on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }
}

impl StoreInner {
    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    fn current_session(&self) -> Option<(UserId, u64)> {
        let state = self.read_state();
        let user_id = state.user_id.clone()?;
        Some((user_id, self.epoch.load(Ordering::SeqCst)))
    }

    /// Bump the epoch, close the previous channel, and reset state.
    fn begin_session(&self, user_id: &UserId) -> u64 {
        let epoch = {
            let mut state = self.write_state();
            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            *state = StoreState::for_user(user_id.clone());
            epoch
        };
        self.close_live();
        self.notify();
        epoch
    }

    fn end_session(&self) {
        {
            let mut state = self.write_state();
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *state = StoreState::default();
        }
        self.close_live();
        self.notify();
    }

    fn close_live(&self) {
        let handle = self.live.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            handle.close();
        }
    }

    fn apply_snapshot(&self, epoch: u64, result: AppResult<Vec<Notification>>) {
        {
            let mut state = self.write_state();
            if !self.is_current(epoch) {
                debug!(epoch, "Discarding stale snapshot");
                return;
            }
            match result {
                Ok(snapshot) => {
                    debug!(count = snapshot.len(), "Applying notification snapshot");
                    state.apply_snapshot(snapshot);
                }
                Err(e) => {
                    warn!(
                        user_id = ?state.user_id,
                        error = %e,
                        "Notification fetch failed; showing no data"
                    );
                    state.degradation.fetch_failed = true;
                }
            }
        }
        self.notify();
    }

    /// Returns `false` once `epoch` is stale so the listener can stop.
    fn merge_live(&self, epoch: u64, event: Notification) -> bool {
        let merged = {
            let mut state = self.write_state();
            if !self.is_current(epoch) {
                return false;
            }
            let id = event.id.clone();
            let merged = state.merge_live(
                event,
                self.config.max_retained,
                self.config.dedup_live_events,
            );
            match merged {
                LiveMerge::Inserted => debug!(notification_id = %id, "Live notification merged"),
                LiveMerge::Duplicate => {
                    debug!(notification_id = %id, "Dropping duplicate live notification")
                }
                LiveMerge::ForeignUser => {
                    warn!(notification_id = %id, "Dropping live notification for another user")
                }
            }
            merged
        };
        if merged == LiveMerge::Inserted {
            self.notify();
        }
        true
    }

    fn set_live_status(&self, epoch: u64, status: LiveStatus) {
        {
            let mut state = self.write_state();
            if !self.is_current(epoch) {
                return;
            }
            state.degradation.live = status;
        }
        self.notify();
    }

    fn attach_live(this: &Arc<Self>, epoch: u64, result: AppResult<LiveSubscription>) {
        let subscription = match result {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(epoch, error = %e, "Live channel unavailable; continuing fetch-only");
                this.set_live_status(epoch, LiveStatus::Unavailable);
                return;
            }
        };

        let mut live = this.live.lock().unwrap_or_else(|e| e.into_inner());
        if !this.is_current(epoch) {
            debug!(epoch, "Closing live channel for superseded session");
            subscription.close();
            return;
        }
        this.set_live_status(epoch, LiveStatus::Connected);
        let close = subscription.close_handle();
        let listener = tokio::spawn(listen(Arc::downgrade(this), epoch, subscription));
        if let Some(previous) = live.replace(LiveHandle { close, listener }) {
            previous.close();
        }
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        self.close_live();
    }
}

/// Forward events from `subscription` into the store until the channel
/// ends, the session changes, or the store is dropped.
async fn listen(store: Weak<StoreInner>, epoch: u64, mut subscription: LiveSubscription) {
    while let Some(event) = subscription.recv().await {
        let Some(inner) = store.upgrade() else {
            return;
        };
        if !inner.merge_live(epoch, event) {
            return;
        }
    }
    if let Some(inner) = store.upgrade() {
        debug!(epoch, "Live channel ended");
        inner.set_live_status(epoch, LiveStatus::Disconnected);
    }
}
