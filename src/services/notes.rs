//! Notes service
//!
//! High-level business logic for notes: lifecycle, version history,
//! and search over the live set.

use crate::database::{CreateNoteRequest, Note, NoteVersion, Repository, UpdateNoteRequest};
use crate::error::Result;

/// Service for managing notes
#[derive(Clone)]
pub struct NotesService {
    repo: Repository,
}

impl NotesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a new note
    pub async fn create_note(&self, req: CreateNoteRequest) -> Result<Note> {
        tracing::info!("Creating new note");

        let note = self.repo.create_note(req).await?;

        tracing::info!("Note created successfully: {}", note.id);

        Ok(note)
    }

    /// Get a live note by ID
    pub async fn get_note(&self, id: &str) -> Result<Note> {
        self.repo.get_note(id).await
    }

    /// List all live notes
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.repo.list_notes().await
    }

    /// List live notes in a folder (None = root)
    pub async fn list_notes_by_folder(&self, folder_id: Option<&str>) -> Result<Vec<Note>> {
        self.repo.list_notes_by_folder(folder_id).await
    }

    /// List live notes carrying a tag
    pub async fn list_notes_by_tag(&self, tag_id: &str) -> Result<Vec<Note>> {
        self.repo.list_notes_by_tag(tag_id).await
    }

    /// Apply a partial update to a note
    pub async fn update_note(&self, id: &str, req: UpdateNoteRequest) -> Result<Note> {
        tracing::debug!("Updating note: {}", id);

        let note = self.repo.update_note(id, req).await?;

        tracing::debug!("Note {} now at version {}", note.id, note.version);

        Ok(note)
    }

    /// Roll a note back to one of its historical versions
    pub async fn restore_version(&self, id: &str, target_version: i64) -> Result<Note> {
        tracing::info!("Restoring note {} to version {}", id, target_version);

        self.repo.restore_note_version(id, target_version).await
    }

    /// List a note's version history, newest first
    pub async fn list_versions(&self, note_id: &str) -> Result<Vec<NoteVersion>> {
        // 404 for notes that don't exist rather than an empty history.
        self.repo.get_note(note_id).await?;
        self.repo.list_versions(note_id).await
    }

    /// Search live notes by title or content (case-insensitive substring)
    pub async fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let all_notes = self.list_notes().await?;

        let query_lower = query.to_lowercase();

        let filtered: Vec<Note> = all_notes
            .into_iter()
            .filter(|note| {
                note.title.to_lowercase().contains(&query_lower)
                    || note.content.to_lowercase().contains(&query_lower)
            })
            .collect();

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> NotesService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        NotesService::new(Repository::new(pool))
    }

    fn req(title: &str, content: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_note() {
        let service = create_test_service().await;

        let note = service.create_note(req("Test", "{}")).await.unwrap();

        let fetched = service.get_note(&note.id).await.unwrap();

        assert_eq!(fetched.id, note.id);
        assert_eq!(fetched.title, "Test");
    }

    #[tokio::test]
    async fn test_search_notes() {
        let service = create_test_service().await;

        service.create_note(req("Apple", "{}")).await.unwrap();
        service.create_note(req("Banana", "{}")).await.unwrap();
        service.create_note(req("Cherry", "{}")).await.unwrap();

        let results = service.search_notes("an").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Banana");
    }

    #[tokio::test]
    async fn test_search_matches_content_case_insensitively() {
        let service = create_test_service().await;

        service
            .create_note(req("Plain", "<p>Grocery LIST</p>"))
            .await
            .unwrap();

        let results = service.search_notes("grocery").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_versions_for_unknown_note_is_not_found() {
        let service = create_test_service().await;

        assert!(service.list_versions("missing").await.is_err());
    }
}
