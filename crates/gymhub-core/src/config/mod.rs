//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `GYMHUB__`-prefixed environment variables. Each sub-module
//! represents a logical configuration section, and every field carries a
//! default so that an empty source still yields a usable configuration.

pub mod api;
pub mod logging;
pub mod notifications;
pub mod realtime;
pub mod session;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::notifications::NotificationsConfig;
use self::realtime::RealtimeConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST backend settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Live event channel settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Notification store settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Session seed used by the binaries.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, an environment-specific overlay
    /// `config/{env}`, and environment variables prefixed with `GYMHUB`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration using an explicit base file path.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GYMHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.notifications.validate()?;
        reqwest::Url::parse(&self.api.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid api.base_url '{}': {e}", self.api.base_url))
        })?;
        if self.realtime.enabled {
            reqwest::Url::parse(&self.realtime.url).map_err(|e| {
                AppError::configuration(format!("Invalid realtime.url '{}': {e}", self.realtime.url))
            })?;
        }
        Ok(())
    }
}
