//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use gymhub_core::config::AppConfig;
use gymhub_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.session.token = shown.session.token.as_deref().map(mask_token);
            output::print_item(&shown, format);
        }
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success("Configuration is valid");
            output::print_kv("API", &config.api.base_url);
            output::print_kv(
                "Live channel",
                if config.realtime.enabled {
                    config.realtime.url.as_str()
                } else {
                    "disabled"
                },
            );
            output::print_kv(
                "Retained / visible",
                &format!(
                    "{} / {}",
                    config.notifications.max_retained, config.notifications.max_visible
                ),
            );
        }
    }

    Ok(())
}

/// Keep the first four characters of a token for display
fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}****")
}
