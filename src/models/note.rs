use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Tag;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub folder_id: Option<String>,
    pub title: String,
    pub content: Option<String>,
    pub is_archived: bool,
    pub is_pinned: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Note {
    pub fn new(
        user_id: String,
        title: String,
        content: Option<String>,
        folder_id: Option<String>,
        is_pinned: bool,
    ) -> Self {
        let now = super::timestamp();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            folder_id,
            title,
            content,
            is_archived: false,
            is_pinned,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A note together with its aggregated tag list. The tag list is always
/// present in responses, empty when the note has no tags.
#[derive(Debug, Clone, Serialize)]
pub struct NoteWithTags {
    #[serde(flatten)]
    pub note: Note,
    pub tags: Vec<Tag>,
}
