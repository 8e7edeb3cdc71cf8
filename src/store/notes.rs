//! Note persistence: dynamic list queries and transactional writes.
//!
//! Mutations that touch both a note's scalar columns and its tag set run
//! inside one transaction; an early return on any path drops the
//! transaction and rolls the whole operation back.

use serde::{Deserialize, Deserializer};
use sqlx::SqlitePool;

use super::filter::{FolderFilter, NoteFilter};
use super::{folders, tags};
use crate::error::AppError;
use crate::models::{Note, NoteWithTags};

pub const TITLE_MAX_LEN: usize = 255;

/// Payload for creating a note.
#[derive(Debug, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<String>,
    pub is_pinned: Option<bool>,
    pub tag_ids: Option<Vec<String>>,
}

/// An absent field leaves the column untouched; an explicit `null` (the
/// inner `None`) clears it.
fn nullable_patch<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial update for a note. Only `title`, `content`, `folder_id`,
/// `is_pinned` and `is_archived` are recognized as scalar patches;
/// unknown keys are dropped during deserialization. `tag_ids`, when
/// present, replaces the full tag set.
#[derive(Debug, Deserialize)]
pub struct NoteChanges {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable_patch")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_patch")]
    pub folder_id: Option<Option<String>>,
    pub is_pinned: Option<bool>,
    pub is_archived: Option<bool>,
    pub tag_ids: Option<Vec<String>>,
}

impl NoteChanges {
    fn has_scalar_fields(&self) -> bool {
        self.title.is_some()
            || self.content.is_some()
            || self.folder_id.is_some()
            || self.is_pinned.is_some()
            || self.is_archived.is_some()
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if title.len() > TITLE_MAX_LEN {
        return Err(AppError::Validation(
            "Title must be at most 255 characters".to_string(),
        ));
    }
    Ok(())
}

/// Store client for the notes table and its tag links. Constructed once
/// at startup and handed to the router through application state.
#[derive(Clone)]
pub struct NoteStore {
    db: SqlitePool,
}

impl NoteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: &str, input: NewNote) -> Result<NoteWithTags, AppError> {
        validate_title(&input.title)?;

        let mut tx = self.db.begin().await?;

        if let Some(folder_id) = input.folder_id.as_deref() {
            if !folders::exists(&mut tx, folder_id, user_id).await? {
                return Err(AppError::InvalidReference(
                    "Folder does not exist".to_string(),
                ));
            }
        }

        let note = Note::new(
            user_id.to_string(),
            input.title,
            input.content,
            input.folder_id,
            input.is_pinned.unwrap_or(false),
        );

        sqlx::query(
            r#"
            INSERT INTO notes (id, user_id, folder_id, title, content, is_archived, is_pinned, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&note.id)
        .bind(&note.user_id)
        .bind(&note.folder_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.is_archived)
        .bind(note.is_pinned)
        .bind(&note.created_at)
        .bind(&note.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(tag_ids) = &input.tag_ids {
            tags::link(&mut tx, &note.id, tag_ids).await?;
        }

        let tag_list = tags::for_note(&mut tx, &note.id).await?;
        tx.commit().await?;

        Ok(NoteWithTags {
            note,
            tags: tag_list,
        })
    }

    /// List the user's notes for one view (active or archived), applying
    /// the filter's predicates in a fixed order and aggregating each
    /// note's tags. Pinned notes always sort first; the requested key
    /// breaks ties within each group, and ordering beyond that is left
    /// to the engine.
    pub async fn list(
        &self,
        user_id: &str,
        filter: &NoteFilter,
    ) -> Result<Vec<NoteWithTags>, AppError> {
        let mut sql =
            String::from("SELECT n.* FROM notes n WHERE n.user_id = ? AND n.is_archived = ?");

        match &filter.folder {
            FolderFilter::Any => {}
            FolderFilter::Unfiled => sql.push_str(" AND n.folder_id IS NULL"),
            FolderFilter::In(_) => sql.push_str(" AND n.folder_id = ?"),
        }
        // An explicit pinned=false behaves like unset; only true narrows
        // the view.
        if filter.pinned == Some(true) {
            sql.push_str(" AND n.is_pinned = 1");
        }
        if filter.search.is_some() {
            sql.push_str(" AND (n.title LIKE ? OR n.content LIKE ?)");
        }
        if filter.tag.is_some() {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM note_tags nt WHERE nt.note_id = n.id AND nt.tag_id = ?)",
            );
        }

        sql.push_str(&format!(
            " ORDER BY n.is_pinned DESC, {} {} LIMIT ? OFFSET ?",
            filter.sort.column(),
            filter.order.keyword()
        ));

        let mut query = sqlx::query_as::<_, Note>(&sql)
            .bind(user_id)
            .bind(filter.archived);
        if let FolderFilter::In(folder_id) = &filter.folder {
            query = query.bind(folder_id);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query = query.bind(pattern.clone()).bind(pattern);
        }
        if let Some(tag_id) = &filter.tag {
            query = query.bind(tag_id);
        }
        query = query.bind(filter.limit).bind(filter.offset());

        let notes = query.fetch_all(&self.db).await?;

        let ids: Vec<String> = notes.iter().map(|n| n.id.clone()).collect();
        let mut conn = self.db.acquire().await?;
        let mut by_note = tags::for_notes(&mut conn, &ids).await?;

        Ok(notes
            .into_iter()
            .map(|note| {
                let tags = by_note.remove(&note.id).unwrap_or_default();
                NoteWithTags { note, tags }
            })
            .collect())
    }

    pub async fn get(&self, user_id: &str, note_id: &str) -> Result<NoteWithTags, AppError> {
        let note: Option<Note> = sqlx::query_as("SELECT * FROM notes WHERE id = ? AND user_id = ?")
            .bind(note_id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        let Some(note) = note else {
            return Err(AppError::NotFound);
        };

        let mut conn = self.db.acquire().await?;
        let tag_list = tags::for_note(&mut conn, &note.id).await?;
        Ok(NoteWithTags {
            note,
            tags: tag_list,
        })
    }

    /// Patch a note. Scalar changes bump `updated_at`; a tag-only patch
    /// replaces the tag set without bumping it. Scalar update and tag
    /// replacement commit or roll back together.
    pub async fn update(
        &self,
        user_id: &str,
        note_id: &str,
        changes: NoteChanges,
    ) -> Result<NoteWithTags, AppError> {
        if let Some(title) = changes.title.as_deref() {
            validate_title(title)?;
        }

        let mut tx = self.db.begin().await?;

        if changes.has_scalar_fields() {
            if let Some(Some(folder_id)) = &changes.folder_id {
                if !folders::exists(&mut tx, folder_id, user_id).await? {
                    return Err(AppError::InvalidReference(
                        "Folder does not exist".to_string(),
                    ));
                }
            }

            let mut assignments: Vec<&str> = Vec::new();
            if changes.title.is_some() {
                assignments.push("title = ?");
            }
            if changes.content.is_some() {
                assignments.push("content = ?");
            }
            if changes.folder_id.is_some() {
                assignments.push("folder_id = ?");
            }
            if changes.is_pinned.is_some() {
                assignments.push("is_pinned = ?");
            }
            if changes.is_archived.is_some() {
                assignments.push("is_archived = ?");
            }

            let sql = format!(
                "UPDATE notes SET {}, updated_at = ? WHERE id = ? AND user_id = ?",
                assignments.join(", ")
            );

            let mut query = sqlx::query(&sql);
            if let Some(title) = &changes.title {
                query = query.bind(title);
            }
            if let Some(content) = &changes.content {
                query = query.bind(content);
            }
            if let Some(folder_id) = &changes.folder_id {
                query = query.bind(folder_id);
            }
            if let Some(is_pinned) = changes.is_pinned {
                query = query.bind(is_pinned);
            }
            if let Some(is_archived) = changes.is_archived {
                query = query.bind(is_archived);
            }

            let result = query
                .bind(crate::models::timestamp())
                .bind(note_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound);
            }
        } else if changes.tag_ids.is_some() {
            // Tag-only patch: the note must still exist and be the
            // caller's, but its updated_at is left alone.
            let row: Option<(i64,)> =
                sqlx::query_as("SELECT 1 FROM notes WHERE id = ? AND user_id = ?")
                    .bind(note_id)
                    .bind(user_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if row.is_none() {
                return Err(AppError::NotFound);
            }
        } else {
            // Nothing recognized in the patch.
            return Err(AppError::NotFound);
        }

        if let Some(tag_ids) = &changes.tag_ids {
            tags::replace(&mut tx, note_id, tag_ids).await?;
        }

        let note: Note = sqlx::query_as("SELECT * FROM notes WHERE id = ? AND user_id = ?")
            .bind(note_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        let tag_list = tags::for_note(&mut tx, note_id).await?;
        tx.commit().await?;

        Ok(NoteWithTags {
            note,
            tags: tag_list,
        })
    }

    pub async fn delete(&self, user_id: &str, note_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
