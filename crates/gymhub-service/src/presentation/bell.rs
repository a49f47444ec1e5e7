//! `NotificationBell`: badge plus dropdown list.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use gymhub_core::types::id::NotificationId;
use gymhub_entity::notification::{Notification, NotificationKind};

use super::style::{KindStyle, relative_time};
use crate::store::NotificationStore;

/// Badge text shown once the unread count exceeds this.
const BADGE_CAP: usize = 99;

/// One row of the dropdown list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationView {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub style: KindStyle,
    pub unread: bool,
    /// Relative age, e.g. "5m ago".
    pub age: String,
    pub redirect_url: Option<String>,
}

impl NotificationView {
    fn render(notification: &Notification, now: DateTime<Utc>) -> Self {
        Self {
            id: notification.id.clone(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            kind: notification.kind.clone(),
            style: KindStyle::of(&notification.kind),
            unread: notification.is_unread(),
            age: relative_time(notification.created_at, now),
            redirect_url: notification.redirect_url.clone(),
        }
    }
}

/// Result of activating a list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Whether the item was unread and a mark-read was issued.
    pub marked: bool,
    /// Where to navigate next, if the item carries a link.
    pub redirect: Option<String>,
}

/// Bell indicator and dropdown panel over a [`NotificationStore`].
#[derive(Debug, Clone)]
pub struct NotificationBell {
    store: NotificationStore,
    max_visible: usize,
    open: bool,
}

impl NotificationBell {
    /// Create a closed bell showing up to the store's configured
    /// `max_visible` items.
    pub fn new(store: NotificationStore) -> Self {
        let max_visible = store.config().max_visible;
        Self {
            store,
            max_visible,
            open: false,
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    /// Badge text, or `None` when there is nothing unread.
    pub fn badge(&self) -> Option<String> {
        match self.store.unread_count() {
            0 => None,
            n if n > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
            n => Some(n.to_string()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Rows shown in the panel, newest first.
    pub fn visible(&self) -> Vec<NotificationView> {
        self.visible_at(Utc::now())
    }

    /// Same as [`visible`](Self::visible) with a fixed clock.
    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<NotificationView> {
        self.store
            .first(self.max_visible)
            .iter()
            .map(|n| NotificationView::render(n, now))
            .collect()
    }

    /// Handle a click on item `id`: mark it read if unread, close the
    /// panel, and hand back its redirect target.
    ///
    /// Returns `None` if the store no longer holds `id`.
    pub async fn activate(&mut self, id: &NotificationId) -> Option<Activation> {
        let target = self
            .store
            .notifications()
            .into_iter()
            .find(|n| &n.id == id)?;

        let marked = target.is_unread();
        if marked {
            self.store.mark_read(id).await;
        }
        self.close();
        debug!(notification_id = %id, marked, "Notification activated");

        Some(Activation {
            marked,
            redirect: target.redirect_url,
        })
    }

    /// Mark every unread visible item read, one call per item.
    ///
    /// Returns how many calls were issued.
    pub async fn mark_all_visible_read(&self) -> usize {
        let unread: Vec<NotificationId> = self
            .store
            .first(self.max_visible)
            .into_iter()
            .filter(Notification::is_unread)
            .map(|n| n.id)
            .collect();

        for id in &unread {
            self.store.mark_read(id).await;
        }
        unread.len()
    }
}
