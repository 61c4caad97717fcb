//! Database migration management commands.

use clap::{Args, Subcommand};

use dirhub_core::config::DatabaseDriver;
use dirhub_core::error::AppError;
use dirhub_database::DatabasePool;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;
    if config.database.driver != DatabaseDriver::Postgres {
        return Err(AppError::configuration(
            "Migrations only apply to the postgres driver",
        ));
    }

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            config.database.run_migrations = false;
            let pool = DatabasePool::connect(&config.database).await?;
            dirhub_database::migration::run_migrations(pool.pool()).await?;
            pool.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
