//! `SessionProvider` trait and the config-seeded static implementation.

use std::fmt::Debug;

use gymhub_core::config::session::SessionConfig;
use gymhub_core::error::AppError;
use gymhub_core::types::id::UserId;
use gymhub_entity::user::{Session, UserRole};

/// Read-only access to the current session.
pub trait SessionProvider: Send + Sync + Debug {
    /// The current session, or `None` when signed out.
    fn current_session(&self) -> Option<Session>;

    /// The current user id, or `None` when signed out.
    fn current_user_id(&self) -> Option<UserId> {
        self.current_session().map(|s| s.user_id)
    }

    /// The current role, or `None` when signed out.
    fn current_role(&self) -> Option<UserRole> {
        self.current_session().map(|s| s.role)
    }

    /// The current bearer token, if any.
    fn token(&self) -> Option<String> {
        self.current_session().and_then(|s| s.token)
    }
}

/// A session fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionProvider {
    session: Option<Session>,
}

impl StaticSessionProvider {
    /// A provider that always returns `session`.
    pub fn new(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// A provider with no session.
    pub fn signed_out() -> Self {
        Self { session: None }
    }

    /// Build from the `[session]` config section.
    ///
    /// A missing or blank `user_id` yields a signed-out provider. A role
    /// that does not parse is a configuration error; a missing role
    /// defaults to `member`.
    pub fn from_config(config: &SessionConfig) -> Result<Self, AppError> {
        let Some(user_id) = config
            .user_id
            .as_deref()
            .map(UserId::from)
            .filter(|id| !id.is_blank())
        else {
            return Ok(Self::signed_out());
        };

        let role = match config.role.as_deref() {
            Some(raw) => raw
                .parse::<UserRole>()
                .map_err(|e| AppError::configuration(format!("session.role: {}", e.message)))?,
            None => UserRole::Member,
        };

        let mut session = Session::new(user_id, role);
        session.token = config.token.clone();
        session.must_change_password = config.must_change_password;
        Ok(Self::new(session))
    }
}

impl SessionProvider for StaticSessionProvider {
    fn current_session(&self) -> Option<Session> {
        self.session.clone()
    }
}
