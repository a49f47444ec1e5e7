//! GymHub notifier: keeps a notification store live for the configured
//! session and logs bell state as it changes.
//!
//! Wires the HTTP transport, the live channel connector, and the session
//! provider into a `NotificationStore`, then runs until Ctrl+C or SIGTERM.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gymhub_auth::session::{SessionProvider, StaticSessionProvider};
use gymhub_client::HttpNotificationClient;
use gymhub_core::config::AppConfig;
use gymhub_core::error::AppError;
use gymhub_realtime::{DisabledLiveConnector, LiveConnector, WsLiveConnector};
use gymhub_service::{NotificationBell, NotificationStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Notifier error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let base = std::env::var("GYMHUB_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("GYMHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&base, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting GymHub notifier v{}", env!("CARGO_PKG_VERSION"));

    let sessions = StaticSessionProvider::from_config(&config.session)?;
    let token = sessions.token();

    let transport = HttpNotificationClient::new(&config.api)?.with_bearer_token(token.clone());
    let connector: Arc<dyn LiveConnector> = if config.realtime.enabled {
        tracing::info!(url = %config.realtime.url, "Live channel enabled");
        Arc::new(WsLiveConnector::new(&config.realtime).with_token(token))
    } else {
        tracing::info!("Live channel disabled; running fetch-only");
        Arc::new(DisabledLiveConnector)
    };

    let store = NotificationStore::builder()
        .transport(Arc::new(transport))
        .connector(connector)
        .config(config.notifications.clone())
        .build()?;

    let mut changes = store.subscribe();
    store.initialize_from_session(&sessions).await;

    if store.user_id().is_none() {
        tracing::warn!("No session configured (session.user_id); nothing to watch");
        return Ok(());
    }

    let bell = NotificationBell::new(store.clone());
    log_bell(&bell);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                changes.borrow_and_update();
                log_bell(&bell);
            }
        }
    }

    store.teardown();
    tracing::info!("Notifier stopped");
    Ok(())
}

fn log_bell(bell: &NotificationBell) {
    let status = bell.store().status();
    tracing::info!(
        unread = bell.unread_count(),
        badge = bell.badge().as_deref().unwrap_or("-"),
        live = ?status.live,
        fetch_failed = status.fetch_failed,
        "Bell updated"
    );
    for view in bell.visible() {
        tracing::debug!(
            id = %view.id,
            kind = %view.kind,
            icon = view.style.icon,
            unread = view.unread,
            age = %view.age,
            "{}",
            view.title
        );
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
