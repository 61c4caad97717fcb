//! Folder CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use dirhub_core::error::AppError;
use dirhub_core::types::{FolderId, UserId};
use dirhub_entity::folder::Folder;

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder (and its object store marker)
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID; omit for a root folder
        #[arg(long)]
        parent: Option<String>,
        /// Owner user ID
        #[arg(long)]
        owner: String,
    },
    /// List every folder ordered by path
    List,
    /// Show one folder
    Get {
        /// Folder ID
        id: String,
    },
    /// List the direct children of a folder
    Children {
        /// Folder ID
        id: String,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Path")]
    full_path: String,
    #[tabled(rename = "Parent")]
    parent_id: String,
    #[tabled(rename = "Owner")]
    owner_id: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.to_string(),
            full_path: folder.full_path.clone(),
            parent_id: folder
                .parent_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            owner_id: folder.owner_id.to_string(),
            created_at: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let (folders, _) = super::build_services(&config).await?;

    match &args.command {
        FolderCommand::Create {
            name,
            parent,
            owner,
        } => {
            let parent_id = parent
                .as_deref()
                .map(|p| super::parse_uuid(p, "parent ID").map(FolderId::from_uuid))
                .transpose()?;
            let owner_id = UserId::from_uuid(super::parse_uuid(owner, "owner ID")?);

            let folder = folders.create(name, parent_id, owner_id).await?;
            match format {
                OutputFormat::Json => output::print_json(&folder),
                OutputFormat::Table => {
                    output::print_success(&format!("Created folder '{}'", folder.full_path));
                    output::print_kv("ID", &folder.id.to_string());
                }
            }
        }
        FolderCommand::List => {
            let rows: Vec<FolderRow> = folders.get_all().await?.iter().map(Into::into).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Get { id } => {
            let id = FolderId::from_uuid(super::parse_uuid(id, "folder ID")?);
            let folder = folders.get_by_id(&id).await?;
            output::print_one(&FolderRow::from(&folder), format);
        }
        FolderCommand::Children { id } => {
            let id = FolderId::from_uuid(super::parse_uuid(id, "folder ID")?);
            let rows: Vec<FolderRow> = folders
                .get_sub_folders(&id)
                .await?
                .iter()
                .map(Into::into)
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
