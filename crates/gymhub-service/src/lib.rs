//! # gymhub-service
//!
//! The notification store (single source of truth for the signed-in user's
//! notifications) and the bell presentation model that renders it.
//!
//! The store merges two sources: a snapshot fetched over HTTP and events
//! pushed over the live channel. Every external call is isolated so a
//! failure degrades the store (empty list, no live updates, unconfirmed read
//! state) instead of propagating.

pub mod presentation;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use presentation::bell::NotificationBell;
pub use store::{Degradation, LiveStatus, MarkReadOutcome, NotificationStore};
