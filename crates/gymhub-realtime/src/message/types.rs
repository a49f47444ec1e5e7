//! Client and server message type definitions.

use serde::{Deserialize, Serialize};

use gymhub_entity::notification::Notification;

/// Messages sent by this client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to a channel.
    Subscribe {
        /// Channel name.
        channel: String,
    },
    /// Unsubscribe from a channel.
    Unsubscribe {
        /// Channel name.
        channel: String,
    },
    /// Reply to an application-level ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Messages sent by the server to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Subscription confirmed.
    Subscribed {
        /// Channel name.
        channel: String,
    },
    /// A notification was just created for the subscribed user.
    NewNotification {
        /// The full notification record.
        notification: Notification,
    },
    /// Application-level keepalive.
    Ping {
        /// Server timestamp.
        timestamp: i64,
    },
    /// Server-side error report.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
    /// Any message type this client does not handle.
    #[serde(other)]
    Unknown,
}
