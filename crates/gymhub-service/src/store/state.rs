//! Store state and the pure merge rules applied to it.

use std::collections::HashSet;

use serde::Serialize;

use gymhub_core::types::id::{NotificationId, UserId};
use gymhub_entity::notification::Notification;

/// State of the live channel as seen by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveStatus {
    /// No session, or torn down.
    #[default]
    Disconnected,
    /// Connect attempt in flight.
    Connecting,
    /// Subscription established and delivering.
    Connected,
    /// Connect failed; the store runs fetch-only until re-initialized.
    Unavailable,
}

/// Which parts of the store are currently degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Degradation {
    /// The last snapshot fetch failed.
    pub fetch_failed: bool,
    /// Live channel state.
    pub live: LiveStatus,
}

impl Degradation {
    /// Whether everything is working.
    pub fn is_healthy(&self) -> bool {
        !self.fetch_failed && self.live == LiveStatus::Connected
    }
}

/// Result of merging one live event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiveMerge {
    Inserted,
    Duplicate,
    ForeignUser,
}

/// Everything guarded by the store's lock.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    /// User the state belongs to.
    pub user_id: Option<UserId>,
    /// Newest-known first.
    pub notifications: Vec<Notification>,
    /// Whether a snapshot has been applied in this session.
    pub snapshot_loaded: bool,
    /// Degradation flags.
    pub degradation: Degradation,
}

impl StoreState {
    /// Fresh state for a new session.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            degradation: Degradation {
                fetch_failed: false,
                live: LiveStatus::Connecting,
            },
            ..Self::default()
        }
    }

    /// Number of unread entries. Always derived, never stored.
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| n.is_unread()).count()
    }

    /// Prepend a live event, bounded to `max_retained`.
    pub fn merge_live(&mut self, event: Notification, max_retained: usize, dedup: bool) -> LiveMerge {
        if self.user_id.as_ref() != Some(&event.user_id) {
            return LiveMerge::ForeignUser;
        }
        if dedup && self.notifications.iter().any(|n| n.id == event.id) {
            return LiveMerge::Duplicate;
        }
        self.notifications.insert(0, event);
        self.notifications.truncate(max_retained);
        LiveMerge::Inserted
    }

    /// Replace the list with a fetched snapshot.
    ///
    /// Before the first snapshot lands, live events already held whose ids
    /// the snapshot lacks stay in front, so an event that raced ahead of the
    /// fetch is not lost. Later snapshots replace the list outright. Entries
    /// read locally stay read even if the snapshot predates the read, and a
    /// repeated id keeps only its first occurrence.
    pub fn apply_snapshot(&mut self, snapshot: Vec<Notification>) {
        let read_locally: HashSet<NotificationId> = self
            .notifications
            .iter()
            .filter(|n| n.is_read())
            .map(|n| n.id.clone())
            .collect();
        let held = std::mem::take(&mut self.notifications);
        let early_live = if self.snapshot_loaded {
            Vec::new()
        } else {
            held
        };

        let mut seen: HashSet<NotificationId> = HashSet::new();
        let mut merged = Vec::with_capacity(snapshot.len() + early_live.len());
        for n in snapshot {
            if seen.insert(n.id.clone()) {
                merged.push(if read_locally.contains(&n.id) {
                    n.into_read()
                } else {
                    n
                });
            }
        }
        let early: Vec<Notification> = early_live
            .into_iter()
            .filter(|n| seen.insert(n.id.clone()))
            .collect();
        merged.splice(0..0, early);

        self.notifications = merged;
        self.snapshot_loaded = true;
        self.degradation.fetch_failed = false;
    }

    /// Set `is_read` on the matching entry. Returns `Some(changed)` when the
    /// entry exists, `None` otherwise.
    pub fn mark_read(&mut self, id: &NotificationId) -> Option<bool> {
        self.notifications
            .iter_mut()
            .find(|n| &n.id == id)
            .map(Notification::mark_read)
    }
}
