//! Authenticated session value.

use serde::{Deserialize, Serialize};

use gymhub_core::types::id::UserId;

use super::role::UserRole;

/// What the rest of the client knows about the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in user.
    pub user_id: UserId,
    /// The user's role.
    pub role: UserRole,
    /// Bearer token for backend calls, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Set after login with a temporary password.
    #[serde(default)]
    pub must_change_password: bool,
}

impl Session {
    /// Create a session with no token and no forced password change.
    pub fn new(user_id: impl Into<UserId>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            token: None,
            must_change_password: false,
        }
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Require a password change before normal navigation.
    pub fn requiring_password_change(mut self) -> Self {
        self.must_change_password = true;
        self
    }
}
