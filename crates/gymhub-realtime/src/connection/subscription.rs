//! Owned handle to an established live subscription.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use gymhub_core::types::id::UserId;
use gymhub_entity::notification::Notification;

/// Unique subscription identifier, for log correlation.
pub type SubscriptionId = Uuid;

/// A live, user-scoped stream of new notifications.
///
/// Closing is idempotent. Dropping the handle closes the channel as well,
/// so a subscription can never outlive its owner.
#[derive(Debug)]
pub struct LiveSubscription {
    /// Unique subscription ID
    id: SubscriptionId,
    /// User this subscription is keyed by
    user_id: UserId,
    /// Incoming events
    events: mpsc::Receiver<Notification>,
    /// Cancels the transport task
    cancel: CancellationToken,
    /// Transport task, if the connector spawned one
    task: Option<JoinHandle<()>>,
    /// When the subscription was established
    opened_at: DateTime<Utc>,
}

impl LiveSubscription {
    /// Wrap an event receiver. `task` is the transport task feeding it,
    /// which must stop when `cancel` fires.
    pub fn new(
        user_id: UserId,
        events: mpsc::Receiver<Notification>,
        cancel: CancellationToken,
        task: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            events,
            cancel,
            task,
            opened_at: Utc::now(),
        }
    }

    /// Subscription ID.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// User the subscription is keyed by.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// When the subscription was established.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// A token that closes this subscription when cancelled. Lets an owner
    /// close the channel while another task is reading from it.
    pub fn close_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive the next event. Returns `None` once closed or once the
    /// transport has ended.
    pub async fn recv(&mut self) -> Option<Notification> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            event = self.events.recv() => event,
        }
    }

    /// Close the channel. Safe to call more than once.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(
                subscription_id = %self.id,
                user_id = %self.user_id,
                "Closing live subscription"
            );
            self.cancel.cancel();
        }
    }

    /// Whether the subscription has been closed.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the transport task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }
}

impl Drop for LiveSubscription {
    fn drop(&mut self) {
        self.close();
    }
}
