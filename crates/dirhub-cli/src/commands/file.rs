//! File CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use dirhub_core::error::AppError;
use dirhub_core::types::{FileId, FolderId, UserId};
use dirhub_entity::file::File;
use dirhub_service::CreateFileRequest;

use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Register a file and print its presigned upload URL
    Create {
        /// File name
        name: String,
        /// Containing folder ID
        #[arg(long)]
        folder: String,
        /// Uploader user ID
        #[arg(long)]
        uploaded_by: String,
        /// Declared size in bytes
        #[arg(long)]
        size: Option<i64>,
        /// Declared MIME type
        #[arg(long)]
        mime_type: Option<String>,
    },
    /// List the files in a folder
    List {
        /// Folder ID
        folder: String,
    },
    /// Show one file
    Get {
        /// File ID
        id: String,
    },
    /// Check the object store and update the upload status
    Confirm {
        /// File ID
        id: String,
    },
    /// Print a time-limited download URL for an uploaded file
    Download {
        /// File ID
        id: String,
    },
    /// Settle pending files whose upload window has closed
    Reconcile {
        /// Maximum number of rows to examine
        #[arg(long, default_value_t = 500)]
        limit: i64,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Path")]
    full_path: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Type")]
    mime_type: String,
    #[tabled(rename = "Expires")]
    upload_expires_at: String,
}

impl From<&File> for FileRow {
    fn from(file: &File) -> Self {
        Self {
            id: file.id.to_string(),
            full_path: file.full_path.clone(),
            status: file.status.to_string(),
            size: file
                .size
                .map(format_bytes)
                .unwrap_or_else(|| "-".to_string()),
            mime_type: file.mime_type.clone().unwrap_or_else(|| "-".to_string()),
            upload_expires_at: file
                .upload_expires_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let (_, files) = super::build_services(&config).await?;

    match &args.command {
        FileCommand::Create {
            name,
            folder,
            uploaded_by,
            size,
            mime_type,
        } => {
            let req = CreateFileRequest {
                name: name.clone(),
                folder_id: FolderId::from_uuid(super::parse_uuid(folder, "folder ID")?),
                size: *size,
                mime_type: mime_type.clone(),
                uploaded_by: UserId::from_uuid(super::parse_uuid(uploaded_by, "uploader ID")?),
            };
            let file = files.create(req).await?;
            match format {
                OutputFormat::Json => output::print_json(&file),
                OutputFormat::Table => {
                    output::print_success(&format!("Registered '{}'", file.full_path));
                    output::print_kv("ID", &file.id.to_string());
                    output::print_kv("Upload URL", file.upload_url.as_deref().unwrap_or("-"));
                    if let Some(at) = file.upload_expires_at {
                        output::print_kv("Expires", &at.to_rfc3339());
                    }
                }
            }
        }
        FileCommand::List { folder } => {
            let folder_id = FolderId::from_uuid(super::parse_uuid(folder, "folder ID")?);
            let rows: Vec<FileRow> = files
                .get_files(&folder_id)
                .await?
                .iter()
                .map(Into::into)
                .collect();
            output::print_list(&rows, format);
        }
        FileCommand::Get { id } => {
            let id = FileId::from_uuid(super::parse_uuid(id, "file ID")?);
            let file = files.get_by_id(&id).await?;
            output::print_one(&FileRow::from(&file), format);
        }
        FileCommand::Confirm { id } => {
            let id = FileId::from_uuid(super::parse_uuid(id, "file ID")?);
            let file = files.confirm_upload(&id).await?;
            output::print_one(&FileRow::from(&file), format);
        }
        FileCommand::Download { id } => {
            let id = FileId::from_uuid(super::parse_uuid(id, "file ID")?);
            let download = files.download_url(&id).await?;
            match format {
                OutputFormat::Json => output::print_json(&download),
                OutputFormat::Table => {
                    output::print_kv("Download URL", &download.url);
                    output::print_kv("Expires", &download.expires_at.to_rfc3339());
                }
            }
        }
        FileCommand::Reconcile { limit } => {
            let report = files.reconcile_pending(*limit).await?;
            match format {
                OutputFormat::Json => output::print_json(&report),
                OutputFormat::Table => {
                    output::print_success("Reconciliation finished");
                    output::print_kv("Examined", &report.examined.to_string());
                    output::print_kv("Confirmed", &report.confirmed.to_string());
                    output::print_kv("Failed", &report.failed.to_string());
                    output::print_kv("Still pending", &report.still_pending.to_string());
                }
            }
        }
    }

    Ok(())
}

/// Format a byte count for display
fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
