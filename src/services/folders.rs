//! Folders service

use crate::database::{CreateFolderRequest, Folder, Repository, UpdateFolderRequest};
use crate::error::Result;

/// Service for managing the folder tree
#[derive(Clone)]
pub struct FoldersService {
    repo: Repository,
}

impl FoldersService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_folder(&self, req: CreateFolderRequest) -> Result<Folder> {
        tracing::info!("Creating folder: {}", req.name);

        self.repo.create_folder(req).await
    }

    pub async fn get_folder(&self, id: &str) -> Result<Folder> {
        self.repo.get_folder(id).await
    }

    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.repo.list_folders().await
    }

    pub async fn update_folder(&self, id: &str, req: UpdateFolderRequest) -> Result<Folder> {
        tracing::debug!("Updating folder: {}", id);

        self.repo.update_folder(id, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> FoldersService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        FoldersService::new(Repository::new(pool))
    }

    #[tokio::test]
    async fn test_folder_crud() {
        let service = create_test_service().await;

        let folder = service
            .create_folder(CreateFolderRequest {
                name: "Work".to_string(),
                parent_id: None,
            })
            .await
            .unwrap();

        let fetched = service.get_folder(&folder.id).await.unwrap();
        assert_eq!(fetched.name, "Work");

        let renamed = service
            .update_folder(
                &folder.id,
                UpdateFolderRequest {
                    name: Some("Projects".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Projects");

        assert_eq!(service.list_folders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_nested_folders() {
        let service = create_test_service().await;

        let parent = service
            .create_folder(CreateFolderRequest {
                name: "Parent".to_string(),
                parent_id: None,
            })
            .await
            .unwrap();

        let child = service
            .create_folder(CreateFolderRequest {
                name: "Child".to_string(),
                parent_id: Some(parent.id.clone()),
            })
            .await
            .unwrap();

        assert_eq!(child.parent_id, Some(parent.id));
    }
}
