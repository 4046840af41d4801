//! Note handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::database::{CreateNoteRequest, Note, NoteVersion, UpdateNoteRequest};
use crate::error::{AppError, Result};

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesQuery {
    /// Filter by folder; an empty value selects root-level notes.
    pub folder_id: Option<String>,
    pub tag_id: Option<String>,
}

/// GET /api/notes
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<Note>>> {
    let notes = if let Some(tag_id) = query.tag_id {
        state.notes.list_notes_by_tag(&tag_id).await?
    } else if let Some(folder_id) = query.folder_id {
        let folder_id = (!folder_id.is_empty()).then_some(folder_id);
        state.notes.list_notes_by_folder(folder_id.as_deref()).await?
    } else {
        state.notes.list_notes().await?
    };

    Ok(Json(notes))
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>)> {
    let note = state.notes.create_note(req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>> {
    Ok(Json(state.notes.get_note(&id).await?))
}

/// PUT /api/notes/{id}
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<Note>> {
    Ok(Json(state.notes.update_note(&id, req).await?))
}

/// GET /api/notes/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<NoteVersion>>> {
    Ok(Json(state.notes.list_versions(&id).await?))
}

/// POST /api/notes/{id}/restore/{version}
pub async fn restore_version(
    State(state): State<AppState>,
    Path((id, version)): Path<(String, i64)>,
) -> Result<Json<Note>> {
    Ok(Json(state.notes.restore_version(&id, version).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/notes/search?q=
pub async fn search_notes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Note>>> {
    let q = query
        .q
        .ok_or_else(|| AppError::Validation("Missing search query".to_string()))?;
    Ok(Json(state.notes.search_notes(&q).await?))
}
