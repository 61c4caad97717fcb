//! Folder handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use dirhub_core::types::{FolderId, UserId};

use crate::dto::request::CreateFolderRequest;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, parse_folder_id};
use crate::state::AppState;

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let folders = state.folder_service.get_all().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folders })))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_folder_id(&id)?;
    let folder = state.folder_service.get_by_id(&id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// GET /api/folders/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_folder_id(&id)?;
    let children = state.folder_service.get_sub_folders(&id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": children }),
    ))
}

/// GET /api/folders/{id}/files
pub async fn list_files(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_folder_id(&id)?;
    let files = state.file_service.get_files(&id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": files })))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let folder = state
        .folder_service
        .create(
            &req.name,
            req.parent_id.map(FolderId::from_uuid),
            UserId::from_uuid(req.owner_id),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": folder })),
    ))
}
