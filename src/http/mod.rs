//! HTTP layer
//!
//! Thin axum adapter over the services. Handlers extract, delegate, and
//! serialize; every behavior lives in the service/repository layers.

pub mod folders;
pub mod notes;
pub mod tags;
pub mod trash;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::database::Repository;
use crate::error::AppError;
use crate::services::{FoldersService, NotesService, RestoreService, TagsService, TrashService};

/// Shared state holding all services
#[derive(Clone)]
pub struct AppState {
    pub notes: NotesService,
    pub folders: FoldersService,
    pub tags: TagsService,
    pub trash: TrashService,
    pub restore: RestoreService,
}

impl AppState {
    pub fn new(repo: Repository) -> Self {
        Self {
            notes: NotesService::new(repo.clone()),
            folders: FoldersService::new(repo.clone()),
            tags: TagsService::new(repo.clone()),
            trash: TrashService::new(repo.clone()),
            restore: RestoreService::new(repo),
        }
    }
}

/// Build the complete router with all routes mounted under `/api`.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route("/notes/search", get(notes::search_notes))
        .route("/notes/{id}", get(notes::get_note).put(notes::update_note))
        .route("/notes/{id}/versions", get(notes::list_versions))
        .route(
            "/notes/{id}/restore/{version}",
            post(notes::restore_version),
        )
        .route(
            "/folders",
            get(folders::list_folders).post(folders::create_folder),
        )
        .route(
            "/folders/{id}",
            get(folders::get_folder).put(folders::update_folder),
        )
        .route("/tags", get(tags::list_tags).post(tags::create_tag))
        .route("/tags/{id}", get(tags::get_tag).put(tags::update_tag))
        .route("/trash", get(trash::list_trash))
        .route("/trash/move-to-trash", post(trash::move_to_trash))
        .route("/trash/restore/{id}", post(trash::restore_entry))
        .route("/trash/cleanup", post(trash::cleanup))
        .route("/trash/{id}", delete(trash::purge_entry));

    Router::new().nest("/api", api).with_state(state)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            other => {
                tracing::error!("Internal server error: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
