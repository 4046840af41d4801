//! Trash handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::database::{MoveToTrashRequest, TrashEntry};
use crate::error::Result;
use crate::services::RestoredItem;

use super::AppState;

/// GET /api/trash
pub async fn list_trash(State(state): State<AppState>) -> Result<Json<Vec<TrashEntry>>> {
    Ok(Json(state.trash.list_trash().await?))
}

/// POST /api/trash/move-to-trash
pub async fn move_to_trash(
    State(state): State<AppState>,
    Json(req): Json<MoveToTrashRequest>,
) -> Result<(StatusCode, Json<TrashEntry>)> {
    let entry = state.trash.move_to_trash(&req.kind, &req.id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/trash/restore/{id}
pub async fn restore_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RestoredItem>> {
    Ok(Json(state.restore.restore_entry(&id).await?))
}

/// DELETE /api/trash/{id}
pub async fn purge_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.trash.purge(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/trash/cleanup
pub async fn cleanup(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let count = state.trash.sweep_expired().await?;
    Ok(Json(
        serde_json::json!({ "success": true, "deletedCount": count }),
    ))
}
