//! Display helpers: per-kind icon and accent, relative timestamps.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gymhub_entity::notification::NotificationKind;

/// Icon and accent color used to render a notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindStyle {
    /// Icon name.
    pub icon: &'static str,
    /// Accent color name.
    pub accent: &'static str,
}

impl KindStyle {
    /// Style for kinds this client does not recognise.
    pub const FALLBACK: Self = Self {
        icon: "bell",
        accent: "gray",
    };

    /// Look up the style for `kind`.
    pub fn of(kind: &NotificationKind) -> Self {
        match kind {
            NotificationKind::Payment => Self {
                icon: "credit-card",
                accent: "green",
            },
            NotificationKind::Membership => Self {
                icon: "id-card",
                accent: "blue",
            },
            NotificationKind::Expiry => Self {
                icon: "clock",
                accent: "orange",
            },
            NotificationKind::Other(_) => Self::FALLBACK,
        }
    }
}

/// Adds `style()` to notification kinds.
pub trait Styled {
    /// Display style for this value.
    fn style(&self) -> KindStyle;
}

impl Styled for NotificationKind {
    fn style(&self) -> KindStyle {
        KindStyle::of(self)
    }
}

/// Short human age of `created_at` as seen at `now`.
///
/// Timestamps in the future render as "just now".
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}
