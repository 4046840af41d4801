//! Folder handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::database::{CreateFolderRequest, Folder, UpdateFolderRequest};
use crate::error::Result;

use super::AppState;

/// GET /api/folders
pub async fn list_folders(State(state): State<AppState>) -> Result<Json<Vec<Folder>>> {
    Ok(Json(state.folders.list_folders().await?))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>)> {
    let folder = state.folders.create_folder(req).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Folder>> {
    Ok(Json(state.folders.get_folder(&id).await?))
}

/// PUT /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<Folder>> {
    Ok(Json(state.folders.update_folder(&id, req).await?))
}
