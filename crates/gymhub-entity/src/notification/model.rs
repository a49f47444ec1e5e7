//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::types::id::{NotificationId, UserId};

use super::kind::NotificationKind;

/// A notification delivered to one user.
///
/// Everything except the read flag is fixed at creation. The read flag only
/// ever moves from unread to read, which is why it is private and only
/// reachable through [`Notification::mark_read`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    #[serde(alias = "_id")]
    pub id: NotificationId,
    /// The recipient user.
    #[serde(alias = "user_id")]
    pub user_id: UserId,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Category tag.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Whether the user has read this notification.
    #[serde(default, alias = "is_read")]
    is_read: bool,
    /// When the notification was created.
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    /// Optional in-app link opened when the notification is activated.
    #[serde(default, alias = "redirect_url", skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl Notification {
    /// Create an unread notification.
    pub fn new(
        id: impl Into<NotificationId>,
        user_id: impl Into<UserId>,
        kind: impl Into<NotificationKind>,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: title.into(),
            message: message.into(),
            kind: kind.into(),
            is_read: false,
            created_at,
            redirect_url: None,
        }
    }

    /// Attach a redirect target.
    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// Return a copy already marked as read.
    pub fn into_read(mut self) -> Self {
        self.is_read = true;
        self
    }

    /// Whether the notification has been read.
    pub fn is_read(&self) -> bool {
        self.is_read
    }

    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Mark as read. Returns `true` if the flag changed.
    pub fn mark_read(&mut self) -> bool {
        let changed = !self.is_read;
        self.is_read = true;
        changed
    }
}
