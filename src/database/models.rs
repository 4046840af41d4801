//! Database models
//!
//! Row structs for all entities plus the request DTOs accepted at the
//! service boundary. Field names serialize as camelCase to match the
//! JSON shapes the Starfire frontend exchanges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::error::{AppError, Result};

/// A note with opaque rich-text content.
///
/// `tags` lives in the `note_tags` join table and is attached after the
/// row fetch, so it is skipped during row decoding.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    /// Serialized editor markup. Never parsed or validated here.
    pub content: String,
    pub folder_id: Option<String>,
    pub is_archived: bool,
    pub is_pinned: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    pub tags: Vec<String>,
}

/// Immutable snapshot of a note's content-bearing fields at one edit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteVersion {
    pub id: String,
    pub note_id: String,
    pub title: String,
    pub content: String,
    pub tags: Json<Vec<String>>,
    pub folder_id: Option<String>,
    pub is_archived: bool,
    pub is_pinned: bool,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    pub change_summary: String,
}

/// A folder in the (single-level-nullable) folder tree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A colored label referenced by notes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The kind of entity a trash entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrashKind {
    Note,
    Folder,
    Tag,
}

impl TrashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrashKind::Note => "note",
            TrashKind::Folder => "folder",
            TrashKind::Tag => "tag",
        }
    }

    /// Parse a kind string, rejecting unknown values before any mutation.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "note" => Ok(TrashKind::Note),
            "folder" => Ok(TrashKind::Folder),
            "tag" => Ok(TrashKind::Tag),
            other => Err(AppError::Validation(format!(
                "Unknown trash item type: {}",
                other
            ))),
        }
    }
}

/// Raw trash row as stored. `data` stays an opaque JSON string here;
/// the listing layer parses it per entry.
#[derive(Debug, Clone, FromRow)]
pub struct TrashItemRow {
    pub id: String,
    pub kind: String,
    pub original_id: String,
    pub data: String,
    pub deleted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A trash entry as surfaced to callers, with `data` parsed into a
/// structured value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TrashKind,
    pub original_id: String,
    pub data: serde_json::Value,
    pub deleted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TrashItemRow {
    /// Parse the stored snapshot. A corrupt payload degrades that single
    /// entry to an empty object rather than failing the whole listing.
    pub fn into_entry(self) -> Result<TrashEntry> {
        let kind = TrashKind::parse(&self.kind)?;
        let data = serde_json::from_str(&self.data).unwrap_or_else(|e| {
            tracing::warn!("Unparseable trash snapshot for entry {}: {}", self.id, e);
            serde_json::Value::Object(serde_json::Map::new())
        });

        Ok(TrashEntry {
            id: self.id,
            kind,
            original_id: self.original_id,
            data,
            deleted_at: self.deleted_at,
            expires_at: self.expires_at,
        })
    }
}

/// Point-in-time snapshot of a soft-deleted entity. The tagged form is
/// the code-level boundary; storage keeps the payload as opaque text
/// alongside the kind column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum TrashedEntity {
    Note(Note),
    Folder(Folder),
    Tag(Tag),
}

impl TrashedEntity {
    pub fn kind(&self) -> TrashKind {
        match self {
            TrashedEntity::Note(_) => TrashKind::Note,
            TrashedEntity::Folder(_) => TrashKind::Folder,
            TrashedEntity::Tag(_) => TrashKind::Tag,
        }
    }

    /// Serialize only the entity payload for the trash `data` column.
    pub fn payload_json(&self) -> Result<String> {
        let json = match self {
            TrashedEntity::Note(n) => serde_json::to_string(n)?,
            TrashedEntity::Folder(f) => serde_json::to_string(f)?,
            TrashedEntity::Tag(t) => serde_json::to_string(t)?,
        };
        Ok(json)
    }
}

// ===== Request DTOs =====

/// Create note request. Missing fields take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub folder_id: Option<String>,
    pub is_archived: Option<bool>,
    pub is_pinned: Option<bool>,
}

/// Partial note update. `folder_id` distinguishes "absent" (unchanged)
/// from explicit `null` (move to root) via the nested Option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub folder_id: Option<Option<String>>,
    pub is_archived: Option<bool>,
    pub is_pinned: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveToTrashRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}
