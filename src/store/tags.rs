//! Many-to-many linkage between notes and tags. All functions take a
//! plain connection so they compose into the caller's transaction.

use sqlx::SqliteConnection;
use std::collections::HashMap;

use crate::models::Tag;

/// Insert (note, tag) pairs, silently skipping pairs that already exist.
pub async fn link(
    conn: &mut SqliteConnection,
    note_id: &str,
    tag_ids: &[String],
) -> Result<(), sqlx::Error> {
    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO note_tags (note_id, tag_id) VALUES (?, ?)")
            .bind(note_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Delete matching (note, tag) pairs; absent pairs are a no-op.
pub async fn unlink(
    conn: &mut SqliteConnection,
    note_id: &str,
    tag_ids: &[String],
) -> Result<(), sqlx::Error> {
    for tag_id in tag_ids {
        sqlx::query("DELETE FROM note_tags WHERE note_id = ? AND tag_id = ?")
            .bind(note_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Replace the full tag set of a note: clear existing links, then insert
/// the new set. An empty set leaves the note with no tags.
pub async fn replace(
    conn: &mut SqliteConnection,
    note_id: &str,
    tag_ids: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM note_tags WHERE note_id = ?")
        .bind(note_id)
        .execute(&mut *conn)
        .await?;
    link(conn, note_id, tag_ids).await
}

/// Tags linked to one note, sorted by name.
pub async fn for_note(conn: &mut SqliteConnection, note_id: &str) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT t.id, t.user_id, t.name
        FROM tags t
        JOIN note_tags nt ON nt.tag_id = t.id
        WHERE nt.note_id = ?
        ORDER BY t.name ASC
        "#,
    )
    .bind(note_id)
    .fetch_all(conn)
    .await
}

/// Tags for a batch of notes, keyed by note id. Notes without tags are
/// simply absent from the map.
pub async fn for_notes(
    conn: &mut SqliteConnection,
    note_ids: &[String],
) -> Result<HashMap<String, Vec<Tag>>, sqlx::Error> {
    if note_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; note_ids.len()].join(", ");
    let sql = format!(
        "SELECT nt.note_id, t.id, t.user_id, t.name \
         FROM tags t \
         JOIN note_tags nt ON nt.tag_id = t.id \
         WHERE nt.note_id IN ({placeholders}) \
         ORDER BY t.name ASC"
    );

    let mut query = sqlx::query_as::<_, (String, String, String, String)>(&sql);
    for note_id in note_ids {
        query = query.bind(note_id);
    }

    let rows = query.fetch_all(conn).await?;
    let mut by_note: HashMap<String, Vec<Tag>> = HashMap::new();
    for (note_id, id, user_id, name) in rows {
        by_note
            .entry(note_id)
            .or_default()
            .push(Tag { id, user_id, name });
    }
    Ok(by_note)
}
