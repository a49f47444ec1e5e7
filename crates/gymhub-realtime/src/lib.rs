//! # gymhub-realtime
//!
//! Best-effort live delivery of new notifications for one user. Provides:
//!
//! - the `LiveConnector` seam the notification store depends on
//! - a WebSocket connector speaking the JSON channel protocol
//! - `LiveSubscription`, an owned handle that closes the channel on drop
//!
//! Nothing here retries: a failed or lost channel is reported once and the
//! caller falls back to fetch-only operation.

pub mod connection;
pub mod connector;
pub mod message;

pub use connection::subscription::LiveSubscription;
pub use connection::ws::WsLiveConnector;
pub use connector::{DisabledLiveConnector, LiveConnector};
