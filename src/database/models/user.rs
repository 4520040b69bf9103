use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Directory row for a regular (provincial) user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub user_name: String,
    pub password_hash: String,
    pub provincial_access: Option<String>,
    pub municipal_access: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Directory row for an administrator account.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i32,
    pub user_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User as exposed to the admin API and CLI. Never carries the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccessView {
    pub id: i32,
    pub user_name: String,
    pub provincial_access: Option<String>,
    pub municipal_access: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
