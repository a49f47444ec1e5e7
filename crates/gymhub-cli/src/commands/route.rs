//! Route guard CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::output::{self, OutputFormat};
use gymhub_auth::{GuardDecision, RouteGuard, RouteRequirement, StaticSessionProvider};
use gymhub_core::config::AppConfig;
use gymhub_core::error::AppError;
use gymhub_entity::user::{Session, UserRole};

/// Arguments for route commands
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Route subcommand
    #[command(subcommand)]
    pub command: RouteCommand,
}

/// Route subcommands
#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Check whether a session may enter a route
    Check {
        /// Route path, e.g. /admin/dashboard
        path: String,
        /// Minimum role the route requires
        #[arg(short, long)]
        requires: Option<String>,
        /// Act as this user instead of the configured session
        #[arg(long = "as")]
        as_user: Option<String>,
        /// Role for --as (defaults to member)
        #[arg(long)]
        role: Option<String>,
        /// Treat the session as needing a password change
        #[arg(long)]
        must_change_password: bool,
    },
}

#[derive(Debug, Serialize)]
struct RouteVerdict {
    path: String,
    allowed: bool,
    redirect: Option<String>,
    reason: &'static str,
}

/// Execute route commands
pub fn execute(args: &RouteArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        RouteCommand::Check {
            path,
            requires,
            as_user,
            role,
            must_change_password,
        } => {
            let sessions = match as_user {
                Some(user) => {
                    let role = role
                        .as_deref()
                        .map(str::parse::<UserRole>)
                        .transpose()?
                        .unwrap_or(UserRole::Member);
                    let mut session = Session::new(user.as_str(), role);
                    if *must_change_password {
                        session = session.requiring_password_change();
                    }
                    StaticSessionProvider::new(session)
                }
                None => StaticSessionProvider::from_config(&config.session)?,
            };

            let requirement = match requires {
                Some(minimum) => RouteRequirement::with_role(path.as_str(), minimum.parse()?),
                None => RouteRequirement::authenticated(path.as_str()),
            };

            let verdict = verdict(path, RouteGuard::new().check(&requirement, &sessions));
            debug!(
                path = %path,
                allowed = verdict.allowed,
                reason = verdict.reason,
                "Route checked"
            );
            match format {
                OutputFormat::Json => output::print_item(&verdict, format),
                OutputFormat::Table if verdict.allowed => {
                    output::print_success(&format!("'{path}' allowed"))
                }
                OutputFormat::Table => output::print_warning(&format!(
                    "'{path}' denied ({}), redirect to {}",
                    verdict.reason,
                    verdict.redirect.as_deref().unwrap_or("-")
                )),
            }
        }
    }

    Ok(())
}

fn verdict(path: &str, decision: GuardDecision) -> RouteVerdict {
    let (allowed, redirect, reason) = match decision {
        GuardDecision::Allow => (true, None, "allowed"),
        GuardDecision::RedirectToLogin { to } => (false, Some(to), "signed out"),
        GuardDecision::RedirectToPasswordChange { to } => {
            (false, Some(to), "password change required")
        }
        GuardDecision::Forbidden { to } => (false, Some(to), "insufficient role"),
    };
    RouteVerdict {
        path: path.to_string(),
        allowed,
        redirect,
        reason,
    }
}
