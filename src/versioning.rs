//! Change-summary classification for note versions
//!
//! Every accepted note mutation is described by a summary string built
//! from a fixed, ordered rule table. The field order is part of the
//! observable contract ("folder changed, pinned" not "pinned, folder
//! changed"), so the rules live in one declarative list instead of
//! scattered conditionals.

use std::collections::HashSet;

use crate::database::models::Note;

/// Summary recorded for the version captured at note creation.
pub const INITIAL_SUMMARY: &str = "Initial version";

/// Actor label for system-generated versions (creation).
pub const ACTOR_SYSTEM: &str = "system";

/// Actor label for user-driven versions (updates, restores).
pub const ACTOR_USER: &str = "user";

/// Summary recorded when a trashed note is restored.
pub const RESTORED_FROM_TRASH: &str = "Restored from trash";

/// Summary recorded when a note is rolled back to a historical version.
pub fn restored_from_version(version: i64) -> String {
    format!("Restored from version {}", version)
}

/// One diff rule: emit a fragment when the field differs between the
/// old and new note states. Evaluation order is the declaration order.
type FieldRule = fn(&Note, &Note) -> Option<&'static str>;

const FIELD_RULES: &[FieldRule] = &[
    |old, new| (old.title != new.title).then_some("title updated"),
    |old, new| (old.content != new.content).then_some("content updated"),
    |old, new| (!same_tag_set(&old.tags, &new.tags)).then_some("tags updated"),
    |old, new| (old.folder_id != new.folder_id).then_some("folder changed"),
    |old, new| {
        (old.is_archived != new.is_archived).then(|| {
            if new.is_archived {
                "archived"
            } else {
                "unarchived"
            }
        })
    },
    |old, new| {
        (old.is_pinned != new.is_pinned).then(|| {
            if new.is_pinned {
                "pinned"
            } else {
                "unpinned"
            }
        })
    },
];

/// Compare the content-bearing fields of two note states.
///
/// Returns the joined change summary, or `None` when nothing differs.
/// A `None` here means the update must be treated as a full no-op:
/// no version row, no version counter increment, no timestamp touch.
pub fn change_summary(old: &Note, new: &Note) -> Option<String> {
    let fragments: Vec<&str> = FIELD_RULES
        .iter()
        .filter_map(|rule| rule(old, new))
        .collect();

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(", "))
    }
}

/// Tag comparison is order-insensitive: `["a","b"]` and `["b","a"]`
/// are the same set.
fn same_tag_set(old: &[String], new: &[String]) -> bool {
    let old: HashSet<&str> = old.iter().map(String::as_str).collect();
    let new: HashSet<&str> = new.iter().map(String::as_str).collect();
    old == new
}
