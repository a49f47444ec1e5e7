//! Notification store.

pub mod builder;
pub mod service;
pub mod state;

pub use builder::NotificationStoreBuilder;
pub use service::{MarkReadOutcome, NotificationStore};
pub use state::{Degradation, LiveStatus};
