use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: String,
    pub user_id: String,
    pub name: String,
}

impl Tag {
    pub fn new(user_id: String, name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name: name.trim().to_string(),
        }
    }
}
