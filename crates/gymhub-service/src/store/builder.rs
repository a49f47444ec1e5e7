//! Builder that refuses to produce a store with missing wiring.

use std::sync::Arc;

use gymhub_client::transport::NotificationTransport;
use gymhub_core::config::notifications::NotificationsConfig;
use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_realtime::connector::LiveConnector;

use super::service::NotificationStore;

/// Collects the store's collaborators. Both the transport and the live
/// connector are required; use `DisabledLiveConnector` for fetch-only mode.
#[derive(Debug, Default)]
pub struct NotificationStoreBuilder {
    transport: Option<Arc<dyn NotificationTransport>>,
    connector: Option<Arc<dyn LiveConnector>>,
    config: NotificationsConfig,
}

impl NotificationStoreBuilder {
    /// Start with default bounds and no collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the REST transport.
    pub fn transport(mut self, transport: Arc<dyn NotificationTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the live channel connector.
    pub fn connector(mut self, connector: Arc<dyn LiveConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Set retention and merge settings.
    pub fn config(mut self, config: NotificationsConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the store.
    pub fn build(self) -> AppResult<NotificationStore> {
        let transport = self.transport.ok_or_else(|| {
            AppError::configuration("NotificationStore requires a transport")
        })?;
        let connector = self.connector.ok_or_else(|| {
            AppError::configuration("NotificationStore requires a live connector")
        })?;
        self.config.validate()?;
        Ok(NotificationStore::from_parts(transport, connector, self.config))
    }
}
