//! Route guard: decides whether the current session may enter a route.

use serde::{Deserialize, Serialize};
use tracing::debug;

use gymhub_entity::user::UserRole;

use crate::session::SessionProvider;

/// Route used for the forced password change flow.
pub const CHANGE_PASSWORD_ROUTE: &str = "/change-password";

/// Route used for sign-in.
pub const LOGIN_ROUTE: &str = "/login";

/// What a route demands of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequirement {
    /// The route path being entered.
    pub path: String,
    /// Minimum role, or `None` for any signed-in user.
    pub minimum_role: Option<UserRole>,
}

impl RouteRequirement {
    /// Any signed-in user may enter.
    pub fn authenticated(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            minimum_role: None,
        }
    }

    /// Only users with at least `role` may enter.
    pub fn with_role(path: impl Into<String>, role: UserRole) -> Self {
        Self {
            path: path.into(),
            minimum_role: Some(role),
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Render the route.
    Allow,
    /// No session; send to the login page.
    RedirectToLogin {
        /// Where to redirect.
        to: String,
    },
    /// Session exists but must change its password first.
    RedirectToPasswordChange {
        /// Where to redirect.
        to: String,
    },
    /// Signed in with an insufficient role; send to the role's home.
    Forbidden {
        /// Where to redirect.
        to: String,
    },
}

impl GuardDecision {
    /// Whether the route may be rendered.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Evaluates [`RouteRequirement`]s against a [`SessionProvider`].
#[derive(Debug, Clone, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Create a guard.
    pub fn new() -> Self {
        Self
    }

    /// Decide whether the current session may enter the route.
    pub fn check(
        &self,
        requirement: &RouteRequirement,
        sessions: &dyn SessionProvider,
    ) -> GuardDecision {
        let Some(session) = sessions.current_session() else {
            debug!(path = %requirement.path, "No session, redirecting to login");
            return GuardDecision::RedirectToLogin {
                to: LOGIN_ROUTE.to_string(),
            };
        };

        if session.must_change_password && requirement.path != CHANGE_PASSWORD_ROUTE {
            return GuardDecision::RedirectToPasswordChange {
                to: CHANGE_PASSWORD_ROUTE.to_string(),
            };
        }

        if let Some(minimum) = requirement.minimum_role
            && !session.role.has_at_least(&minimum)
        {
            debug!(
                path = %requirement.path,
                role = %session.role,
                minimum = %minimum,
                "Insufficient role"
            );
            return GuardDecision::Forbidden {
                to: session.role.home_route().to_string(),
            };
        }

        GuardDecision::Allow
    }
}
