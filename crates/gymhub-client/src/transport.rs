//! Transport trait consumed by the notification store.

use async_trait::async_trait;

use gymhub_core::result::AppResult;
use gymhub_core::types::id::{NotificationId, UserId};
use gymhub_entity::notification::{NewNotification, Notification};

/// Request/response operations against the notification backend.
///
/// Failures are reported as `Network`, `Server`, or `Serialization` errors.
/// Callers decide how to degrade; implementations never retry.
#[async_trait]
pub trait NotificationTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the current snapshot of a user's notifications.
    async fn fetch_for_user(&self, user_id: &UserId) -> AppResult<Vec<Notification>>;

    /// Ask the backend to mark one notification read.
    ///
    /// Returns the updated record when the backend sends one back.
    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
    ) -> AppResult<Option<Notification>>;

    /// Create a notification (producer side).
    async fn create(&self, payload: &NewNotification) -> AppResult<Notification>;
}
