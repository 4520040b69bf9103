use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::access::AccessStatus;
use crate::auth;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Admin, User, UserAccessView};
use crate::database::registry;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User not found")]
    UserNotFound,
    #[error("Username already exists: {0}")]
    DuplicateUser(String),
    #[error("Unknown province code: {0}")]
    UnknownProvince(String),
    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Operations against the central directory database (users, admins,
/// provinces). Shared by the HTTP handlers and the CLI.
pub struct DirectoryService {
    pool: PgPool,
}

const USER_COLUMNS: &str =
    "id, user_name, password_hash, provincial_access, municipal_access, created_at";

impl DirectoryService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::directory_pool().await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_user_by_name(&self, user_name: &str) -> Result<Option<User>, DirectoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = $1"
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_admin_by_name(&self, user_name: &str) -> Result<Option<Admin>, DirectoryError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, user_name, password_hash, created_at FROM admins WHERE user_name = $1",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    /// Create a pending user account. Access fields stay empty until an
    /// administrator assigns them.
    pub async fn create_user(&self, user_name: &str, password: &str) -> Result<User, DirectoryError> {
        if self.name_taken(user_name).await? {
            return Err(DirectoryError::DuplicateUser(user_name.to_string()));
        }

        let password_hash = auth::hash_password(password)?;
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (user_name, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(user_name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        info!("Registered pending user '{}'", user_name);
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<UserAccessView>, DirectoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users.into_iter().map(user_view).collect())
    }

    /// Replace both access fields on a user. A non-empty provincial code
    /// must resolve through the province registry.
    pub async fn set_user_access(
        &self,
        user_id: i32,
        provincial: Option<&str>,
        municipal: Option<&str>,
    ) -> Result<UserAccessView, DirectoryError> {
        let provincial = normalize_field(provincial);
        let municipal = normalize_field(municipal);

        if let Some(code) = provincial.as_deref() {
            if !registry::exists(&self.pool, code).await? {
                return Err(DirectoryError::UnknownProvince(code.to_string()));
            }
        }

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET provincial_access = $2, municipal_access = $3 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(provincial.as_deref())
        .bind(municipal.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DirectoryError::UserNotFound)?;

        info!(
            "Access updated for user '{}': provincial={:?} municipal={:?}",
            updated.user_name, updated.provincial_access, updated.municipal_access
        );
        Ok(user_view(updated))
    }

    /// Create the directory tables when they do not exist yet.
    pub async fn ensure_directory_schema(&self) -> Result<(), DirectoryError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (\
                id SERIAL PRIMARY KEY, \
                user_name TEXT UNIQUE NOT NULL, \
                password_hash TEXT NOT NULL, \
                provincial_access TEXT, \
                municipal_access TEXT, \
                created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS admins (\
                id SERIAL PRIMARY KEY, \
                user_name TEXT UNIQUE NOT NULL, \
                password_hash TEXT NOT NULL, \
                created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS provinces (\
                id SERIAL PRIMARY KEY, \
                code TEXT UNIQUE NOT NULL, \
                database TEXT NOT NULL, \
                display_name TEXT, \
                is_active BOOLEAN NOT NULL DEFAULT true)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Seed or reset an admin account. Used by `rptgis init`.
    pub async fn upsert_admin(&self, user_name: &str, password: &str) -> Result<Admin, DirectoryError> {
        let password_hash = auth::hash_password(password)?;
        let admin = sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (user_name, password_hash) VALUES ($1, $2) \
             ON CONFLICT (user_name) DO UPDATE SET password_hash = EXCLUDED.password_hash \
             RETURNING id, user_name, password_hash, created_at",
        )
        .bind(user_name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        info!("Admin account '{}' ready", user_name);
        Ok(admin)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn name_taken(&self, user_name: &str) -> Result<bool, DirectoryError> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM users WHERE user_name = $1 \
             UNION SELECT 1 FROM admins WHERE user_name = $1 LIMIT 1",
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }
}

fn user_view(user: User) -> UserAccessView {
    let status = AccessStatus::evaluate(
        user.provincial_access.as_deref(),
        user.municipal_access.as_deref(),
    );
    UserAccessView {
        id: user.id,
        user_name: user.user_name,
        provincial_access: user.provincial_access,
        municipal_access: user.municipal_access,
        status: status.as_str().to_string(),
        created_at: user.created_at,
    }
}

fn normalize_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
