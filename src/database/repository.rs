//! Repository layer for database operations
//!
//! Owns every SQL statement in the application. Multi-row mutations
//! (note update + version append, trash pairing, delete cascades) run
//! inside a single transaction so partial application can never be
//! observed.

use super::models::*;
use crate::config::{TRASH_RETENTION_DAYS, VERSION_RETENTION_LIMIT};
use crate::error::{AppError, Result};
use crate::versioning;
use chrono::{Duration, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool, e.g. for ad-hoc queries in tests.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Notes =====

    /// Create a new note and capture its initial version.
    pub async fn create_note(&self, req: CreateNoteRequest) -> Result<Note> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let title = match req.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => crate::config::DEFAULT_NOTE_TITLE.to_string(),
        };
        let tags = dedup_tags(req.tags.unwrap_or_default());

        let mut tx = self.pool.begin().await?;

        ensure_tags_resolve(&mut tx, &tags).await?;
        ensure_folder_resolves(&mut tx, req.folder_id.as_deref()).await?;

        let mut note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, title, content, folder_id, is_archived, is_pinned,
                               version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&title)
        .bind(req.content.unwrap_or_default())
        .bind(&req.folder_id)
        .bind(req.is_archived.unwrap_or(false))
        .bind(req.is_pinned.unwrap_or(false))
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        write_note_tags(&mut tx, &id, &tags).await?;
        note.tags = tags;

        insert_version(
            &mut tx,
            &note,
            versioning::ACTOR_SYSTEM,
            versioning::INITIAL_SUMMARY,
        )
        .await?;

        tx.commit().await?;

        tracing::debug!("Created note: {}", id);
        Ok(note)
    }

    /// Get a live note by ID.
    pub async fn get_note(&self, id: &str) -> Result<Note> {
        let mut note = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note not found: {}", id)))?;

        note.tags = load_note_tags(&self.pool, id).await?;
        Ok(note)
    }

    /// Raw lookup by ID, including soft-deleted notes.
    pub async fn find_note_any(&self, id: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match note {
            Some(mut note) => {
                note.tags = load_note_tags(&self.pool, id).await?;
                Ok(Some(note))
            }
            None => Ok(None),
        }
    }

    /// List all live notes, most recently updated first.
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE deleted_at IS NULL ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        self.attach_tags(notes).await
    }

    /// List live notes in a folder. `None` lists root-level notes.
    pub async fn list_notes_by_folder(&self, folder_id: Option<&str>) -> Result<Vec<Note>> {
        let notes = match folder_id {
            Some(fid) => {
                sqlx::query_as::<_, Note>(
                    r#"
                    SELECT * FROM notes
                    WHERE folder_id = ? AND deleted_at IS NULL
                    ORDER BY updated_at DESC
                    "#,
                )
                .bind(fid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Note>(
                    r#"
                    SELECT * FROM notes
                    WHERE folder_id IS NULL AND deleted_at IS NULL
                    ORDER BY updated_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        self.attach_tags(notes).await
    }

    /// List live notes carrying the given tag.
    pub async fn list_notes_by_tag(&self, tag_id: &str) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT n.* FROM notes n
            JOIN note_tags nt ON nt.note_id = n.id
            WHERE nt.tag_id = ? AND n.deleted_at IS NULL
            ORDER BY n.updated_at DESC
            "#,
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_tags(notes).await
    }

    /// Apply a partial update to a live note.
    ///
    /// When the merged state differs from the current one, the note's
    /// version counter advances by exactly one and a version row is
    /// appended in the same transaction. When nothing differs the call
    /// is a full no-op: no version, no counter, no timestamp change.
    pub async fn update_note(&self, id: &str, req: UpdateNoteRequest) -> Result<Note> {
        let mut tx = self.pool.begin().await?;

        let mut current = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note not found: {}", id)))?;
        current.tags = load_tags_tx(&mut tx, id).await?;

        let mut updated = current.clone();
        if let Some(title) = req.title {
            updated.title = title;
        }
        if let Some(content) = req.content {
            updated.content = content;
        }
        if let Some(folder_id) = req.folder_id {
            ensure_folder_resolves(&mut tx, folder_id.as_deref()).await?;
            updated.folder_id = folder_id;
        }
        if let Some(is_archived) = req.is_archived {
            updated.is_archived = is_archived;
        }
        if let Some(is_pinned) = req.is_pinned {
            updated.is_pinned = is_pinned;
        }
        let tags_provided = req.tags.is_some();
        if let Some(tags) = req.tags {
            let tags = dedup_tags(tags);
            ensure_tags_resolve(&mut tx, &tags).await?;
            updated.tags = tags;
        }

        let summary = match versioning::change_summary(&current, &updated) {
            Some(summary) => summary,
            None => {
                // Nothing observable changed; leave version and
                // updated_at untouched.
                return Ok(current);
            }
        };

        updated.version = current.version + 1;
        updated.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE notes
            SET title = ?, content = ?, folder_id = ?, is_archived = ?,
                is_pinned = ?, version = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&updated.title)
        .bind(&updated.content)
        .bind(&updated.folder_id)
        .bind(updated.is_archived)
        .bind(updated.is_pinned)
        .bind(updated.version)
        .bind(updated.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if tags_provided {
            sqlx::query("DELETE FROM note_tags WHERE note_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            write_note_tags(&mut tx, id, &updated.tags).await?;
        }

        insert_version(&mut tx, &updated, versioning::ACTOR_USER, &summary).await?;

        tx.commit().await?;

        tracing::debug!("Updated note {} to version {}: {}", id, updated.version, summary);
        Ok(updated)
    }

    /// Roll a live note back to one of its historical versions.
    ///
    /// Always records a new version, even when the target's fields equal
    /// the current state. A user-initiated restore is a meaningful event
    /// and is exempt from no-op suppression.
    pub async fn restore_note_version(&self, id: &str, target_version: i64) -> Result<Note> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note not found: {}", id)))?;

        let target = sqlx::query_as::<_, NoteVersion>(
            "SELECT * FROM note_versions WHERE note_id = ? AND version = ?",
        )
        .bind(id)
        .bind(target_version)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Version {} not found for note {}", target_version, id))
        })?;

        // Snapshot tags may reference tags deleted since the capture;
        // only those that still resolve are re-linked.
        let mut tags = Vec::new();
        for tag_id in target.tags.0.iter() {
            let exists: Option<i32> =
                sqlx::query_scalar("SELECT 1 FROM tags WHERE id = ? AND deleted_at IS NULL")
                    .bind(tag_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_some() {
                tags.push(tag_id.clone());
            }
        }

        // Same hygiene for the snapshot's folder reference.
        let folder_id = match target.folder_id {
            Some(fid) => folder_is_live(&mut tx, &fid).await?.then_some(fid),
            None => None,
        };

        let mut updated = current;
        updated.title = target.title;
        updated.content = target.content;
        updated.folder_id = folder_id;
        updated.is_archived = target.is_archived;
        updated.is_pinned = target.is_pinned;
        updated.tags = tags;
        updated.version += 1;
        updated.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE notes
            SET title = ?, content = ?, folder_id = ?, is_archived = ?,
                is_pinned = ?, version = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&updated.title)
        .bind(&updated.content)
        .bind(&updated.folder_id)
        .bind(updated.is_archived)
        .bind(updated.is_pinned)
        .bind(updated.version)
        .bind(updated.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM note_tags WHERE note_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        write_note_tags(&mut tx, id, &updated.tags).await?;

        insert_version(
            &mut tx,
            &updated,
            versioning::ACTOR_USER,
            &versioning::restored_from_version(target_version),
        )
        .await?;

        tx.commit().await?;

        tracing::info!("Restored note {} from version {}", id, target_version);
        Ok(updated)
    }

    /// List a note's versions, newest version number first.
    pub async fn list_versions(&self, note_id: &str) -> Result<Vec<NoteVersion>> {
        let versions = sqlx::query_as::<_, NoteVersion>(
            "SELECT * FROM note_versions WHERE note_id = ? ORDER BY version DESC",
        )
        .bind(note_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(versions)
    }

    // ===== Folders =====

    pub async fn create_folder(&self, req: CreateFolderRequest) -> Result<Folder> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let folder = sqlx::query_as::<_, Folder>(
            r#"
            INSERT INTO folders (id, name, parent_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.parent_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created folder: {}", id);
        Ok(folder)
    }

    pub async fn get_folder(&self, id: &str) -> Result<Folder> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Folder not found: {}", id)))
    }

    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE deleted_at IS NULL ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(folders)
    }

    pub async fn update_folder(&self, id: &str, req: UpdateFolderRequest) -> Result<Folder> {
        let mut folder = self.get_folder(id).await?;

        if let Some(name) = req.name {
            folder.name = name;
        }
        if let Some(parent_id) = req.parent_id {
            folder.parent_id = parent_id;
        }
        folder.updated_at = Utc::now();

        sqlx::query(
            "UPDATE folders SET name = ?, parent_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&folder.name)
        .bind(&folder.parent_id)
        .bind(folder.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(folder)
    }

    // ===== Tags =====

    pub async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, name, color, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.color)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created tag: {}", id);
        Ok(tag)
    }

    pub async fn get_tag(&self, id: &str) -> Result<Tag> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = ? AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag not found: {}", id)))
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT * FROM tags WHERE deleted_at IS NULL ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    pub async fn update_tag(&self, id: &str, req: UpdateTagRequest) -> Result<Tag> {
        let mut tag = self.get_tag(id).await?;

        if let Some(name) = req.name {
            tag.name = name;
        }
        if let Some(color) = req.color {
            tag.color = color;
        }
        tag.updated_at = Utc::now();

        sqlx::query("UPDATE tags SET name = ?, color = ?, updated_at = ? WHERE id = ?")
            .bind(&tag.name)
            .bind(&tag.color)
            .bind(tag.updated_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(tag)
    }

    // ===== Trash =====

    /// Soft-delete an entity into the trash.
    ///
    /// One transaction writes the trash snapshot, sets the deletion
    /// marker, and applies the kind's referential cascade (folder
    /// children move to the folder's parent, tag references are removed
    /// from notes). Either everything lands or nothing does.
    pub async fn move_to_trash(&self, kind: TrashKind, id: &str) -> Result<TrashEntry> {
        let now = Utc::now();
        let expires_at = now + Duration::days(TRASH_RETENTION_DAYS);

        let mut tx = self.pool.begin().await?;

        let snapshot = match kind {
            TrashKind::Note => {
                let mut note = sqlx::query_as::<_, Note>(
                    "SELECT * FROM notes WHERE id = ? AND deleted_at IS NULL",
                )
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Note not found: {}", id)))?;
                note.tags = load_tags_tx(&mut tx, id).await?;

                sqlx::query("UPDATE notes SET deleted_at = ? WHERE id = ?")
                    .bind(now)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                TrashedEntity::Note(note)
            }
            TrashKind::Folder => {
                let folder = sqlx::query_as::<_, Folder>(
                    "SELECT * FROM folders WHERE id = ? AND deleted_at IS NULL",
                )
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Folder not found: {}", id)))?;

                sqlx::query("UPDATE folders SET deleted_at = ? WHERE id = ?")
                    .bind(now)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                // Notes in the folder move up to its parent rather than
                // being left pointing at a trashed folder.
                sqlx::query(
                    "UPDATE notes SET folder_id = ? WHERE folder_id = ? AND deleted_at IS NULL",
                )
                .bind(&folder.parent_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                TrashedEntity::Folder(folder)
            }
            TrashKind::Tag => {
                let tag = sqlx::query_as::<_, Tag>(
                    "SELECT * FROM tags WHERE id = ? AND deleted_at IS NULL",
                )
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Tag not found: {}", id)))?;

                sqlx::query("UPDATE tags SET deleted_at = ? WHERE id = ?")
                    .bind(now)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                // No note may keep referencing a trashed tag.
                sqlx::query("DELETE FROM note_tags WHERE tag_id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                TrashedEntity::Tag(tag)
            }
        };

        let entry_id = Uuid::new_v4().to_string();
        let data = snapshot.payload_json()?;

        sqlx::query(
            r#"
            INSERT INTO trash_items (id, kind, original_id, data, deleted_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry_id)
        .bind(kind.as_str())
        .bind(id)
        .bind(&data)
        .bind(now)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Moved {} {} to trash as entry {}", kind.as_str(), id, entry_id);

        Ok(TrashEntry {
            id: entry_id,
            kind,
            original_id: id.to_string(),
            data: serde_json::from_str(&data)?,
            deleted_at: now,
            expires_at,
        })
    }

    /// Restore a trash entry, un-deleting its original entity.
    ///
    /// The entry row is claimed with a transactional DELETE: of two
    /// concurrent restore/purge calls on the same entry exactly one
    /// observes the row, the other gets NotFound. If the original
    /// entity vanished (concurrent purge committed first), the whole
    /// transaction rolls back and the caller sees Conflict.
    pub async fn restore_from_trash(&self, entry_id: &str) -> Result<(TrashKind, String)> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = claim_entry(&mut tx, entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trash entry not found: {}", entry_id)))?;

        let kind = TrashKind::parse(&row.kind)?;
        let original_id = row.original_id.clone();

        let rows_affected = match kind {
            TrashKind::Note => {
                let affected = sqlx::query(
                    "UPDATE notes SET deleted_at = NULL, version = version + 1, updated_at = ? \
                     WHERE id = ? AND deleted_at IS NOT NULL",
                )
                .bind(now)
                .bind(&original_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

                if affected > 0 {
                    // A trash restore is a meaningful event in the
                    // note's history and is always recorded.
                    let mut note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = ?")
                        .bind(&original_id)
                        .fetch_one(&mut *tx)
                        .await?;
                    note.tags = load_tags_tx(&mut tx, &original_id).await?;

                    // The folder may have been trashed or purged while
                    // the note sat in the trash; the note comes back at
                    // the root rather than pointing at a dead folder.
                    if let Some(fid) = note.folder_id.take() {
                        if folder_is_live(&mut tx, &fid).await? {
                            note.folder_id = Some(fid);
                        } else {
                            sqlx::query("UPDATE notes SET folder_id = NULL WHERE id = ?")
                                .bind(&original_id)
                                .execute(&mut *tx)
                                .await?;
                        }
                    }

                    insert_version(
                        &mut tx,
                        &note,
                        versioning::ACTOR_USER,
                        versioning::RESTORED_FROM_TRASH,
                    )
                    .await?;
                }

                affected
            }
            TrashKind::Folder => {
                // Reinstate snapshot fields alongside clearing the
                // marker. Cascades applied at deletion time (notes
                // moved to the parent) are deliberately not undone.
                match serde_json::from_str::<Folder>(&row.data) {
                    Ok(snapshot) => {
                        // The snapshot parent may have been purged while
                        // this folder sat in the trash; fall back to the
                        // root instead of reinstating a dead reference.
                        let parent_id = match snapshot.parent_id {
                            Some(pid) => folder_is_live(&mut tx, &pid).await?.then_some(pid),
                            None => None,
                        };

                        sqlx::query(
                            "UPDATE folders SET deleted_at = NULL, name = ?, parent_id = ?, \
                             updated_at = ? WHERE id = ? AND deleted_at IS NOT NULL",
                        )
                        .bind(&snapshot.name)
                        .bind(&parent_id)
                        .bind(now)
                        .bind(&original_id)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected()
                    }
                    Err(e) => {
                        tracing::warn!("Unparseable folder snapshot for {}: {}", entry_id, e);
                        sqlx::query(
                            "UPDATE folders SET deleted_at = NULL, updated_at = ? \
                             WHERE id = ? AND deleted_at IS NOT NULL",
                        )
                        .bind(now)
                        .bind(&original_id)
                        .execute(&mut *tx)
                        .await?
                        .rows_affected()
                    }
                }
            }
            TrashKind::Tag => match serde_json::from_str::<Tag>(&row.data) {
                Ok(snapshot) => sqlx::query(
                    "UPDATE tags SET deleted_at = NULL, name = ?, color = ?, updated_at = ? \
                     WHERE id = ? AND deleted_at IS NOT NULL",
                )
                .bind(&snapshot.name)
                .bind(&snapshot.color)
                .bind(now)
                .bind(&original_id)
                .execute(&mut *tx)
                .await?
                .rows_affected(),
                Err(e) => {
                    tracing::warn!("Unparseable tag snapshot for {}: {}", entry_id, e);
                    sqlx::query(
                        "UPDATE tags SET deleted_at = NULL, updated_at = ? \
                         WHERE id = ? AND deleted_at IS NOT NULL",
                    )
                    .bind(now)
                    .bind(&original_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
                }
            },
        };

        if rows_affected == 0 {
            // Original entity is gone; roll back so the entry survives
            // and the caller can decide what to do.
            return Err(AppError::Conflict(format!(
                "Original {} {} no longer exists",
                kind.as_str(),
                original_id
            )));
        }

        tx.commit().await?;

        tracing::info!("Restored {} {} from trash entry {}", kind.as_str(), original_id, entry_id);
        Ok((kind, original_id))
    }

    /// Permanently delete a trash entry and its original entity.
    ///
    /// A missing original is not an error: purge's goal is absence.
    pub async fn purge_trash_entry(&self, entry_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let row = claim_entry(&mut tx, entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trash entry not found: {}", entry_id)))?;

        let kind = TrashKind::parse(&row.kind)?;
        hard_delete_original(&mut tx, kind, &row.original_id).await?;

        tx.commit().await?;

        tracing::info!("Purged {} {} (entry {})", kind.as_str(), row.original_id, entry_id);
        Ok(())
    }

    /// Purge every trash entry past its expiry deadline.
    ///
    /// Each entry is processed in its own transaction; entries claimed
    /// by a concurrent sweep or a user-initiated purge are skipped.
    /// Returns the number of entries this call purged.
    pub async fn sweep_expired(&self) -> Result<u64> {
        let now = Utc::now();

        let expired: Vec<String> =
            sqlx::query_scalar("SELECT id FROM trash_items WHERE expires_at < ?")
                .bind(now)
                .fetch_all(&self.pool)
                .await?;

        let mut purged = 0u64;
        for entry_id in expired {
            match self.purge_trash_entry(&entry_id).await {
                Ok(()) => purged += 1,
                Err(AppError::NotFound(_)) => {
                    // Already claimed elsewhere; absence is the goal.
                }
                Err(e) => return Err(e),
            }
        }

        if purged > 0 {
            tracing::info!("Expiry sweep purged {} trash entries", purged);
        }
        Ok(purged)
    }

    /// List all trash entries, newest deletion first.
    pub async fn list_trash(&self) -> Result<Vec<TrashEntry>> {
        let rows = sqlx::query_as::<_, TrashItemRow>(
            "SELECT * FROM trash_items ORDER BY deleted_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TrashItemRow::into_entry).collect()
    }

    /// Look up a single trash entry.
    pub async fn find_trash_entry(&self, entry_id: &str) -> Result<Option<TrashEntry>> {
        let row = sqlx::query_as::<_, TrashItemRow>("SELECT * FROM trash_items WHERE id = ?")
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TrashItemRow::into_entry).transpose()
    }

    async fn attach_tags(&self, mut notes: Vec<Note>) -> Result<Vec<Note>> {
        for note in &mut notes {
            note.tags = load_note_tags(&self.pool, &note.id).await?;
        }
        Ok(notes)
    }
}

/// Claim a trash entry by deleting its row inside the transaction.
/// Returns the row if this transaction won the claim.
async fn claim_entry(
    tx: &mut Transaction<'_, Sqlite>,
    entry_id: &str,
) -> Result<Option<TrashItemRow>> {
    let row = sqlx::query_as::<_, TrashItemRow>(
        "DELETE FROM trash_items WHERE id = ? RETURNING *",
    )
    .bind(entry_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

async fn hard_delete_original(
    tx: &mut Transaction<'_, Sqlite>,
    kind: TrashKind,
    original_id: &str,
) -> Result<()> {
    let sql = match kind {
        // Versions and tag links cascade via foreign keys.
        TrashKind::Note => "DELETE FROM notes WHERE id = ?",
        TrashKind::Folder => "DELETE FROM folders WHERE id = ?",
        TrashKind::Tag => "DELETE FROM tags WHERE id = ?",
    };

    sqlx::query(sql).bind(original_id).execute(&mut **tx).await?;
    Ok(())
}

/// Append a version row for the note's current state and prune the
/// oldest rows beyond the retention ceiling.
async fn insert_version(
    tx: &mut Transaction<'_, Sqlite>,
    note: &Note,
    updated_by: &str,
    change_summary: &str,
) -> Result<()> {
    let tags_json = serde_json::to_string(&note.tags)?;

    sqlx::query(
        r#"
        INSERT INTO note_versions (id, note_id, title, content, tags, folder_id,
                                   is_archived, is_pinned, version, updated_at,
                                   updated_by, change_summary)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&note.id)
    .bind(&note.title)
    .bind(&note.content)
    .bind(&tags_json)
    .bind(&note.folder_id)
    .bind(note.is_archived)
    .bind(note.is_pinned)
    .bind(note.version)
    .bind(note.updated_at)
    .bind(updated_by)
    .bind(change_summary)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM note_versions
        WHERE note_id = ? AND id NOT IN (
            SELECT id FROM note_versions WHERE note_id = ?
            ORDER BY version DESC LIMIT ?
        )
        "#,
    )
    .bind(&note.id)
    .bind(&note.id)
    .bind(VERSION_RETENTION_LIMIT)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn load_note_tags(pool: &SqlitePool, note_id: &str) -> Result<Vec<String>> {
    let tags = sqlx::query_scalar(
        "SELECT tag_id FROM note_tags WHERE note_id = ? ORDER BY tag_id",
    )
    .bind(note_id)
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

async fn load_tags_tx(tx: &mut Transaction<'_, Sqlite>, note_id: &str) -> Result<Vec<String>> {
    let tags = sqlx::query_scalar(
        "SELECT tag_id FROM note_tags WHERE note_id = ? ORDER BY tag_id",
    )
    .bind(note_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(tags)
}

async fn write_note_tags(
    tx: &mut Transaction<'_, Sqlite>,
    note_id: &str,
    tags: &[String],
) -> Result<()> {
    for tag_id in tags {
        sqlx::query("INSERT INTO note_tags (note_id, tag_id) VALUES (?, ?)")
            .bind(note_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Reject references to tags that do not resolve to a live tag.
async fn ensure_tags_resolve(tx: &mut Transaction<'_, Sqlite>, tags: &[String]) -> Result<()> {
    for tag_id in tags {
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM tags WHERE id = ? AND deleted_at IS NULL")
                .bind(tag_id)
                .fetch_optional(&mut **tx)
                .await?;
        if exists.is_none() {
            return Err(AppError::Validation(format!("Unknown tag: {}", tag_id)));
        }
    }
    Ok(())
}

async fn folder_is_live(tx: &mut Transaction<'_, Sqlite>, folder_id: &str) -> Result<bool> {
    let exists: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM folders WHERE id = ? AND deleted_at IS NULL")
            .bind(folder_id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(exists.is_some())
}

/// Reject a folder reference that does not resolve to a live folder.
async fn ensure_folder_resolves(
    tx: &mut Transaction<'_, Sqlite>,
    folder_id: Option<&str>,
) -> Result<()> {
    if let Some(folder_id) = folder_id {
        if !folder_is_live(tx, folder_id).await? {
            return Err(AppError::Validation(format!("Unknown folder: {}", folder_id)));
        }
    }
    Ok(())
}

fn dedup_tags(mut tags: Vec<String>) -> Vec<String> {
    tags.sort();
    tags.dedup();
    tags
}
