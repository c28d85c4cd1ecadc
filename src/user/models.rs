use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::types::Role;

/// Database model for users table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    pub fn role(&self) -> Role {
        Role::from_is_admin(self.is_admin)
    }
}

/// Fields required to insert a user; the repository assigns id and timestamp
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

impl NewUser {
    /// Materializes the row the in-memory repository stores
    pub fn into_model(self, id: i64) -> UserModel {
        UserModel {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            is_admin: self.role.is_admin(),
            created_at: Utc::now(),
        }
    }
}
