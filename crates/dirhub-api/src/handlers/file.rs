//! File handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use dirhub_core::types::{FolderId, UserId};
use dirhub_service::CreateFileRequest as SvcCreateFile;

use crate::dto::request::{CreateFileRequest, ReconcileQuery};
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery, parse_file_id};
use crate::state::AppState;

/// POST /api/files
///
/// The response carries the one-time `upload_url`.
pub async fn create_file(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateFileRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let file = state
        .file_service
        .create(SvcCreateFile {
            name: req.name,
            folder_id: FolderId::from_uuid(req.folder_id),
            size: req.size,
            mime_type: req.mime_type,
            uploaded_by: UserId::from_uuid(req.uploaded_by),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": file })),
    ))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_file_id(&id)?;
    let file = state.file_service.get_by_id(&id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}

/// POST /api/files/{id}/confirm
pub async fn confirm_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_file_id(&id)?;
    let file = state.file_service.confirm_upload(&id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": file })))
}

/// GET /api/files/{id}/download
///
/// Only uploaded files have a download URL.
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_file_id(&id)?;
    let download = state.file_service.download_url(&id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": download })))
}

/// POST /api/files/reconcile?limit=...
pub async fn reconcile(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ReconcileQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.file_service.reconcile_pending(query.limit).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": report })))
}
