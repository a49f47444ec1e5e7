//! Session seed configuration.

use serde::{Deserialize, Serialize};

/// Session values the binaries start with. Token storage itself is owned
/// elsewhere; this only seeds a static session provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Current user identifier.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Role name: `"admin"`, `"trainer"` or `"member"`.
    #[serde(default)]
    pub role: Option<String>,
    /// Bearer token sent to the backend.
    #[serde(default)]
    pub token: Option<String>,
    /// Whether the account must change its password before anything else.
    #[serde(default)]
    pub must_change_password: bool,
}
