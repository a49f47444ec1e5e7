//! Notification CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, info};

use crate::output::{self, OutputFormat};
use gymhub_client::NotificationTransport;
use gymhub_core::config::AppConfig;
use gymhub_core::error::AppError;
use gymhub_core::types::id::NotificationId;
use gymhub_entity::notification::{NewNotification, Notification};
use gymhub_service::presentation::relative_time;
use gymhub_service::{MarkReadOutcome, NotificationBell};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List a user's notifications
    List {
        /// User id (defaults to session.user_id)
        #[arg(short, long)]
        user: Option<String>,
        /// Only show unread entries
        #[arg(long)]
        unread: bool,
    },
    /// Show the unread count and badge text
    Unread {
        /// User id (defaults to session.user_id)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Mark one notification read
    MarkRead {
        /// Notification id
        id: String,
        /// User id (defaults to session.user_id)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Mark every unread notification in the visible window read
    MarkAll {
        /// User id (defaults to session.user_id)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Create a notification for a user
    Create {
        /// Recipient user id
        #[arg(short, long)]
        user: String,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Body text
        #[arg(short, long)]
        message: String,
        /// Category tag (payment, membership, expiry, ...)
        #[arg(short, long, default_value = "membership")]
        kind: String,
        /// In-app link opened on activation
        #[arg(short, long)]
        redirect: Option<String>,
    },
}

/// Notification display row for table output
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    id: String,
    #[tabled(rename = "type")]
    kind: String,
    title: String,
    read: String,
    age: String,
    redirect: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind.to_string(),
            title: n.title.clone(),
            read: if n.is_read() { "yes" } else { "no" }.to_string(),
            age: relative_time(n.created_at, chrono::Utc::now()),
            redirect: n.redirect_url.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UnreadSummary {
    user_id: String,
    unread: usize,
    badge: Option<String>,
}

/// Execute notification commands
pub async fn execute(
    args: &NotificationArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        NotificationCommand::List { user, unread } => {
            let user_id = super::resolve_user(user.as_deref(), config)?;
            let client = super::create_client(config)?;
            debug!(user_id = %user_id, unread_only = *unread, "Listing notifications");
            let rows: Vec<NotificationRow> = client
                .fetch_for_user(&user_id)
                .await?
                .iter()
                .filter(|n| !unread || n.is_unread())
                .map(NotificationRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        NotificationCommand::Unread { user } => {
            let user_id = super::resolve_user(user.as_deref(), config)?;
            let store = super::create_store(config)?;
            store.initialize(&user_id).await;
            if store.status().fetch_failed {
                return Err(AppError::network(format!(
                    "Could not fetch notifications for '{user_id}'"
                )));
            }
            let bell = NotificationBell::new(store);
            let summary = UnreadSummary {
                user_id: user_id.to_string(),
                unread: bell.unread_count(),
                badge: bell.badge(),
            };
            match format {
                OutputFormat::Json => output::print_item(&summary, format),
                OutputFormat::Table => {
                    output::print_kv("User", &summary.user_id);
                    output::print_kv("Unread", &summary.unread.to_string());
                    output::print_kv("Badge", summary.badge.as_deref().unwrap_or("-"));
                }
            }
        }
        NotificationCommand::MarkRead { id, user } => {
            let user_id = super::resolve_user(user.as_deref(), config)?;
            let store = super::create_store(config)?;
            store.initialize(&user_id).await;
            match store.mark_read(&NotificationId::new(id.as_str())).await {
                MarkReadOutcome::Confirmed { .. } => {
                    output::print_success(&format!("Notification '{id}' marked read"))
                }
                MarkReadOutcome::LocalOnly { .. } => {
                    output::print_warning(&format!("Backend did not confirm read for '{id}'"))
                }
                MarkReadOutcome::NoSession => {
                    return Err(AppError::internal("Store has no active session"));
                }
            }
        }
        NotificationCommand::MarkAll { user } => {
            let user_id = super::resolve_user(user.as_deref(), config)?;
            let store = super::create_store(config)?;
            store.initialize(&user_id).await;
            let bell = NotificationBell::new(store);
            let issued = bell.mark_all_visible_read().await;
            info!(user_id = %user_id, issued, "Marked visible notifications read");
            output::print_success(&format!("Marked {issued} notification(s) read"));
        }
        NotificationCommand::Create {
            user,
            title,
            message,
            kind,
            redirect,
        } => {
            let payload = NewNotification {
                user_id: user.clone(),
                title: title.clone(),
                message: message.clone(),
                kind: kind.clone(),
                redirect_url: redirect.clone(),
            };
            payload.check()?;
            let client = super::create_client(config)?;
            let created = client.create(&payload).await?;
            info!(
                notification_id = %created.id,
                user_id = %created.user_id,
                "Notification created"
            );
            match format {
                OutputFormat::Json => output::print_item(&created, format),
                OutputFormat::Table => {
                    output::print_success(&format!("Created notification '{}'", created.id))
                }
            }
        }
    }

    Ok(())
}
