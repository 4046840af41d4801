//! Restore coordinator
//!
//! The single entry point for bringing trashed entities back to life.
//! Note restores are reconciled with the versioning rules (a restored
//! note gets a "Restored from trash" version); folder and tag restores
//! only reinstate the entity's own fields. Cascading side effects of
//! the original deletion are never undone.

use crate::database::{Repository, TrashKind};
use crate::error::Result;

/// What a restore brought back.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredItem {
    #[serde(rename = "type")]
    pub kind: TrashKind,
    pub id: String,
}

/// Coordinates trash restores with note versioning
#[derive(Clone)]
pub struct RestoreService {
    repo: Repository,
}

impl RestoreService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Restore a trash entry.
    ///
    /// Exactly one of two concurrent restore/purge calls on the same
    /// entry wins; the loser observes NotFound. A vanished original
    /// surfaces as Conflict with the entry left intact.
    pub async fn restore_entry(&self, entry_id: &str) -> Result<RestoredItem> {
        tracing::info!("Restoring trash entry: {}", entry_id);

        let (kind, id) = self.repo.restore_from_trash(entry_id).await?;

        Ok(RestoredItem { kind, id })
    }
}
