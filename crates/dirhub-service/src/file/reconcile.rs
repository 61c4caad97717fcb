//! Sweep of pending files whose upload window has closed.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dirhub_core::error::AppError;
use dirhub_core::result::AppResult;
use dirhub_entity::file::UploadStatus;

use super::service::FileService;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Expired pending rows looked at.
    pub examined: usize,
    /// Rows whose object was found.
    pub confirmed: usize,
    /// Rows with no object.
    pub failed: usize,
    /// Rows left pending because the check itself failed.
    pub still_pending: usize,
}

impl FileService {
    /// Settle up to `limit` pending files whose upload URL has expired.
    ///
    /// A failed check on one row is logged and does not stop the sweep.
    pub async fn reconcile_pending(&self, limit: i64) -> AppResult<ReconcileReport> {
        if limit <= 0 {
            return Err(AppError::validation("Limit must be positive"));
        }

        let expired = self.files.find_pending_expired(Utc::now(), limit).await?;
        let mut report = ReconcileReport {
            examined: expired.len(),
            ..Default::default()
        };

        for file in expired {
            let id = file.id;
            match self.settle(file).await {
                Ok(settled) => match settled.status {
                    UploadStatus::Uploaded => report.confirmed += 1,
                    UploadStatus::Failed => report.failed += 1,
                    UploadStatus::Pending => report.still_pending += 1,
                },
                Err(e) => {
                    warn!(file_id = %id, error = %e, "Failed to reconcile file");
                    report.still_pending += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            confirmed = report.confirmed,
            failed = report.failed,
            still_pending = report.still_pending,
            "Reconciled pending uploads"
        );
        Ok(report)
    }
}
