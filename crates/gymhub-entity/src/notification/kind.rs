//! Notification category tag.

use serde::{Deserialize, Serialize};

/// Category of a notification.
///
/// The set is open-ended: producers may introduce new tags at any time, so
/// anything unrecognised is kept verbatim in [`NotificationKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    /// Payment received, due, or failed.
    Payment,
    /// Membership created, renewed, or changed.
    Membership,
    /// Membership or pass about to expire.
    Expiry,
    /// Any tag this client does not know about.
    Other(String),
}

impl NotificationKind {
    /// Return the wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Payment => "payment",
            Self::Membership => "membership",
            Self::Expiry => "expiry",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this is a tag the client recognises.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for NotificationKind {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "payment" => Self::Payment,
            "membership" => Self::Membership,
            "expiry" => Self::Expiry,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
