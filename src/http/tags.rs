//! Tag handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::database::{CreateTagRequest, Tag, UpdateTagRequest};
use crate::error::Result;

use super::AppState;

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>> {
    Ok(Json(state.tags.list_tags().await?))
}

/// POST /api/tags
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>)> {
    let tag = state.tags.create_tag(req).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// GET /api/tags/{id}
pub async fn get_tag(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Tag>> {
    Ok(Json(state.tags.get_tag(&id).await?))
}

/// PUT /api/tags/{id}
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<Tag>> {
    Ok(Json(state.tags.update_tag(&id, req).await?))
}
