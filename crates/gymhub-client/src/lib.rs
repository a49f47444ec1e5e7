//! # gymhub-client
//!
//! Request/response access to the notification backend. The client owns no
//! state and caches nothing; every call is a single HTTP round trip.

pub mod body;
pub mod http;
pub mod transport;

pub use http::HttpNotificationClient;
pub use transport::NotificationTransport;
