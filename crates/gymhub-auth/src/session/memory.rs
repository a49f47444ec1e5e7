//! Mutable in-process session, for login/logout flows and tests.

use std::sync::RwLock;

use tracing::info;

use gymhub_entity::user::Session;

use super::provider::SessionProvider;

/// Session held in memory and replaced on login/logout.
#[derive(Debug, Default)]
pub struct MemorySessionProvider {
    session: RwLock<Option<Session>>,
}

impl MemorySessionProvider {
    /// Create a signed-out provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session.
    pub fn login(&self, session: Session) {
        info!(user_id = %session.user_id, role = %session.role, "Session started");
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session);
    }

    /// Clear the current session.
    pub fn logout(&self) {
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = guard.take() {
            info!(user_id = %previous.user_id, "Session ended");
        }
    }

    /// Clear the forced password change flag after a successful change.
    pub fn complete_password_change(&self) {
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        if let Some(session) = guard.as_mut() {
            session.must_change_password = false;
        }
    }
}

impl SessionProvider for MemorySessionProvider {
    fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
