//! Trash service
//!
//! Soft-delete staging area across notes, folders, and tags. Restores
//! go through the restore coordinator, which reconciles them with note
//! versioning.

use crate::database::{Repository, TrashEntry, TrashKind};
use crate::error::Result;

/// Service for the soft-delete staging area
#[derive(Clone)]
pub struct TrashService {
    repo: Repository,
}

impl TrashService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Soft-delete an entity. The kind string is validated before any
    /// state is touched.
    pub async fn move_to_trash(&self, kind: &str, id: &str) -> Result<TrashEntry> {
        let kind = TrashKind::parse(kind)?;

        tracing::info!("Moving {} {} to trash", kind.as_str(), id);

        self.repo.move_to_trash(kind, id).await
    }

    /// Permanently delete a trash entry and its original entity
    pub async fn purge(&self, entry_id: &str) -> Result<()> {
        tracing::info!("Purging trash entry: {}", entry_id);

        self.repo.purge_trash_entry(entry_id).await
    }

    /// Purge all entries past their expiry deadline
    pub async fn sweep_expired(&self) -> Result<u64> {
        self.repo.sweep_expired().await
    }

    /// List all trash entries, newest deletion first
    pub async fn list_trash(&self) -> Result<Vec<TrashEntry>> {
        self.repo.list_trash().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, CreateNoteRequest};
    use crate::error::AppError;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Repository::new(pool)
    }

    #[tokio::test]
    async fn test_unknown_kind_rejected_before_mutation() {
        let repo = create_test_repo().await;
        let service = TrashService::new(repo.clone());

        let note = repo
            .create_note(CreateNoteRequest {
                title: Some("N".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = service.move_to_trash("book", &note.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Nothing was touched.
        assert!(repo.get_note(&note.id).await.is_ok());
        assert!(service.list_trash().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trash_listing_order() {
        let repo = create_test_repo().await;
        let service = TrashService::new(repo.clone());

        for title in ["first", "second"] {
            let note = repo
                .create_note(CreateNoteRequest {
                    title: Some(title.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
            service.move_to_trash("note", &note.id).await.unwrap();
        }

        let trash = service.list_trash().await.unwrap();
        assert_eq!(trash.len(), 2);
        // Newest deletion first.
        assert!(trash[0].deleted_at >= trash[1].deleted_at);
    }
}
