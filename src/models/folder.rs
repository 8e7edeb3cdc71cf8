use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_COLOR: &str = "#808080";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

impl Folder {
    pub fn new(user_id: String, name: String, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name,
            color: color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            created_at: super::timestamp(),
        }
    }
}
