//! The connector seam between the store and a concrete push transport.

use async_trait::async_trait;

use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::types::id::UserId;

use crate::connection::subscription::LiveSubscription;

/// Opens a user-scoped live subscription.
///
/// Any failure (missing capability, refused connection, handshake error)
/// is returned as a `ChannelUnavailable` error and is never retried here.
#[async_trait]
pub trait LiveConnector: Send + Sync + std::fmt::Debug + 'static {
    /// Establish the channel for `user_id` and start delivering events.
    async fn connect(&self, user_id: &UserId) -> AppResult<LiveSubscription>;
}

/// Connector used when live delivery is switched off in config.
#[derive(Debug, Clone, Default)]
pub struct DisabledLiveConnector;

#[async_trait]
impl LiveConnector for DisabledLiveConnector {
    async fn connect(&self, _user_id: &UserId) -> AppResult<LiveSubscription> {
        Err(AppError::channel_unavailable("Live channel disabled by configuration"))
    }
}
