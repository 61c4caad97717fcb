//! CLI command definitions and dispatch.

pub mod config;
pub mod file;
pub mod folder;
pub mod migrate;
pub mod serve;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use dirhub_core::config::AppConfig;
use dirhub_core::error::AppError;
use dirhub_database::MetadataStores;
use dirhub_service::{FileService, FolderService, UploadPolicy};
use dirhub_storage::build_object_store;

use crate::output::OutputFormat;

/// DirHub: folder and file namespace over PostgreSQL and S3
#[derive(Debug, Parser)]
#[command(name = "dirhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

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
    /// Start the DirHub server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Folder(args) => folder::execute(args, &self.config, self.format).await,
            Commands::File(args) => file::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: wire both services from configuration
pub async fn build_services(config: &AppConfig) -> Result<(FolderService, FileService), AppError> {
    let stores = MetadataStores::connect(&config.database).await?;
    let objects = build_object_store(&config.storage).await?;

    let folders = FolderService::new(Arc::clone(&stores.folders), Arc::clone(&objects));
    let files = FileService::new(
        Arc::clone(&stores.files),
        Arc::clone(&stores.folders),
        objects,
        UploadPolicy::from(&config.storage),
    );
    Ok((folders, files))
}

/// Helper: parse a UUID argument
pub fn parse_uuid(value: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|e| AppError::validation(format!("Invalid {what}: {e}")))
}
