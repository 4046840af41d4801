//! Tags service

use crate::database::{CreateTagRequest, Repository, Tag, UpdateTagRequest};
use crate::error::Result;

/// Service for managing tags
#[derive(Clone)]
pub struct TagsService {
    repo: Repository,
}

impl TagsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag> {
        tracing::info!("Creating tag: {}", req.name);

        self.repo.create_tag(req).await
    }

    pub async fn get_tag(&self, id: &str) -> Result<Tag> {
        self.repo.get_tag(id).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.repo.list_tags().await
    }

    pub async fn update_tag(&self, id: &str, req: UpdateTagRequest) -> Result<Tag> {
        tracing::debug!("Updating tag: {}", id);

        self.repo.update_tag(id, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> TagsService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        TagsService::new(Repository::new(pool))
    }

    #[tokio::test]
    async fn test_tag_crud() {
        let service = create_test_service().await;

        let tag = service
            .create_tag(CreateTagRequest {
                name: "urgent".to_string(),
                color: "#ff0000".to_string(),
            })
            .await
            .unwrap();

        let fetched = service.get_tag(&tag.id).await.unwrap();
        assert_eq!(fetched.name, "urgent");
        assert_eq!(fetched.color, "#ff0000");

        let updated = service
            .update_tag(
                &tag.id,
                UpdateTagRequest {
                    color: Some("#00ff00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.color, "#00ff00");

        assert_eq!(service.list_tags().await.unwrap().len(), 1);
    }
}
