use axum::{extract::Request, middleware::Next, response::Response};
use sqlx::PgPool;

use super::auth::AuthUser;
use crate::auth::UserType;
use crate::database::models::User;
use crate::database::{registry, DatabaseManager};
use crate::error::ApiError;

/// Routed provincial database context, injected by middleware
#[derive(Clone)]
pub struct ProvincialDb {
    pub pool: PgPool,
    /// Database name as reported by the connected session.
    pub database: String,
    pub provincial: String,
    pub municipal: Option<String>,
}

/// Middleware for the routed tier: resolves the authenticated user's
/// provincial access code through the registry and injects a live pool
/// for the province database.
///
/// The access fields are re-read from the directory on every request, so
/// access granted or revoked after token issue takes effect immediately.
pub async fn provincial_db_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required"))?
        .clone();

    // This tier serves provincial users only
    if auth_user.user_type == UserType::Admin {
        return Err(ApiError::forbidden("Admins not allowed for this route."));
    }

    let directory = DatabaseManager::directory_pool().await?;
    let user = sqlx::query_as::<_, User>(
        "SELECT id, user_name, password_hash, provincial_access, municipal_access, created_at \
         FROM users WHERE id = $1",
    )
    .bind(auth_user.user_id)
    .fetch_optional(&directory)
    .await?
    .ok_or_else(|| ApiError::unauthorized("User not found."))?;

    let provincial = match user.provincial_access.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => {
            return Err(ApiError::forbidden(
                "No provincial access assigned. Please contact administrator.",
            ))
        }
    };

    let province = registry::resolve(&directory, &provincial)
        .await?
        .ok_or_else(|| {
            tracing::warn!("No active province registered for code '{}'", provincial);
            ApiError::forbidden(format!("Unknown provincial access: {}", provincial))
        })?;

    let pool = DatabaseManager::province_pool(&province.database).await?;

    // Trust the session, not the registry, for the connected name
    let database: String = sqlx::query_scalar("SELECT current_database()")
        .fetch_one(&pool)
        .await?;

    tracing::debug!(
        "Routed user '{}' to province database '{}'",
        auth_user.user_name,
        database
    );

    request.extensions_mut().insert(ProvincialDb {
        pool,
        database,
        provincial,
        municipal: user.municipal_access,
    });

    Ok(next.run(request).await)
}
