//! Notification store configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Bounds and merge policy for the in-memory notification list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum entries kept after a live event is merged.
    #[serde(default = "default_max_retained")]
    pub max_retained: usize,
    /// Maximum entries shown by the bell dropdown.
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
    /// Drop live events whose id is already held.
    #[serde(default = "default_true")]
    pub dedup_live_events: bool,
}

impl NotificationsConfig {
    /// Check that the bounds are coherent.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_retained == 0 {
            return Err(AppError::configuration(
                "notifications.max_retained must be greater than zero",
            ));
        }
        if self.max_visible > self.max_retained {
            return Err(AppError::configuration(format!(
                "notifications.max_visible ({}) exceeds max_retained ({})",
                self.max_visible, self.max_retained
            )));
        }
        Ok(())
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_retained: default_max_retained(),
            max_visible: default_max_visible(),
            dedup_live_events: true,
        }
    }
}

fn default_max_retained() -> usize {
    20
}

fn default_max_visible() -> usize {
    10
}

fn default_true() -> bool {
    true
}
