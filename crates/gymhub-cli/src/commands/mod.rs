//! CLI command definitions and dispatch.

pub mod config;
pub mod notifications;
pub mod route;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use gymhub_client::HttpNotificationClient;
use gymhub_core::config::AppConfig;
use gymhub_core::error::AppError;
use gymhub_core::types::id::UserId;
use gymhub_realtime::DisabledLiveConnector;
use gymhub_service::NotificationStore;

/// GymHub notification tooling
#[derive(Debug, Parser)]
#[command(name = "gymhub", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read, mark and create notifications
    Notifications(notifications::NotificationArgs),
    /// Evaluate route protection for a session
    Route(route::RouteArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let app_config = AppConfig::load_from(&self.config, &self.env)?;
        match &self.command {
            Commands::Notifications(args) => {
                notifications::execute(args, &app_config, self.format).await
            }
            Commands::Route(args) => route::execute(args, &app_config, self.format),
            Commands::Config(args) => config::execute(args, &app_config, self.format),
        }
    }
}

/// Helper: HTTP client carrying the configured bearer token
pub fn create_client(config: &AppConfig) -> Result<HttpNotificationClient, AppError> {
    Ok(HttpNotificationClient::new(&config.api)?.with_bearer_token(config.session.token.clone()))
}

/// Helper: fetch-only store; the CLI never opens a live channel
pub fn create_store(config: &AppConfig) -> Result<NotificationStore, AppError> {
    NotificationStore::builder()
        .transport(Arc::new(create_client(config)?))
        .connector(Arc::new(DisabledLiveConnector))
        .config(config.notifications.clone())
        .build()
}

/// Helper: `--user` if given, else the configured session user
pub fn resolve_user(explicit: Option<&str>, config: &AppConfig) -> Result<UserId, AppError> {
    explicit
        .map(str::to_string)
        .or_else(|| config.session.user_id.clone())
        .map(UserId::new)
        .filter(|id| !id.is_blank())
        .ok_or_else(|| {
            AppError::validation("No user given: pass --user or set session.user_id")
        })
}
