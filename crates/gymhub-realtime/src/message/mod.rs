//! Wire messages for the live channel.

pub mod codec;
pub mod types;

pub use types::{ClientMessage, ServerMessage};

use gymhub_core::types::id::UserId;

/// Channel name the server routes a user's notifications to.
pub fn notification_channel(user_id: &UserId) -> String {
    format!("notifications:{user_id}")
}
