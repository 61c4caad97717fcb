//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use dirhub_core::error::AppError;

use crate::output::{self, OutputFormat};

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
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = match super::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("Configuration invalid: {e}"));
            return Err(e);
        }
    };
    let shown = config.redacted();

    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(&shown),
            OutputFormat::Table => {
                output::print_kv("Server", &shown.server.bind_addr());
                output::print_kv("Database driver", &format!("{:?}", shown.database.driver));
                output::print_kv("Database URL", &shown.database.url);
                output::print_kv("Storage provider", shown.storage.provider.as_str());
                output::print_kv("Bucket", &shown.storage.bucket);
                output::print_kv("S3 endpoint", &shown.storage.s3.endpoint);
                output::print_kv("Marker style", &format!("{:?}", shown.storage.marker_style));
                output::print_kv(
                    "Presign expiry",
                    &format!("{} min", shown.storage.presign_expiry_minutes),
                );
                output::print_kv(
                    "Retry attempts",
                    &shown.storage.retry.max_attempts.to_string(),
                );
                output::print_kv("Log level", &shown.logging.level);
            }
        },
        ConfigCommand::Validate => {
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Server", &shown.server.bind_addr());
            output::print_kv("Database", &shown.database.url);
            output::print_kv("Storage", shown.storage.provider.as_str());
        }
    }

    Ok(())
}
