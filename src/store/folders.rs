use sqlx::SqliteConnection;

/// Whether the folder exists and belongs to the given user. Consulted
/// inside note-write transactions: the foreign key alone would accept
/// another user's folder id.
pub async fn exists(
    conn: &mut SqliteConnection,
    folder_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM folders WHERE id = ? AND user_id = ?")
        .bind(folder_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}
