//! Producer-side notification payload.

use serde::{Deserialize, Serialize};
use validator::Validate;

use gymhub_core::error::AppError;

/// Payload for `POST /notifications/create`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    /// Recipient user identifier.
    #[validate(length(min = 1, message = "Recipient user id is required"))]
    pub user_id: String,
    /// Title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    /// Category tag.
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub kind: String,
    /// Optional redirect target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl NewNotification {
    /// Run field validation, mapping failures into [`AppError`].
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::validation(format!("Invalid notification payload: {e}")))
    }
}
