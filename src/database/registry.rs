//! Province registry: the mapping from a user's provincial access code to
//! the physical database that serves it. Routing never trusts the code
//! itself, only what the registry resolves it to.

use sqlx::PgPool;

use crate::database::models::Province;

/// Resolve an access code to its active registry row.
pub async fn resolve(pool: &PgPool, code: &str) -> Result<Option<Province>, sqlx::Error> {
    sqlx::query_as::<_, Province>(
        "SELECT id, code, database, display_name, is_active \
         FROM provinces WHERE code = $1 AND is_active = true",
    )
    .bind(code)
    .fetch_optional(pool)
    .await
}

/// All registry rows, active or not.
pub async fn list(pool: &PgPool) -> Result<Vec<Province>, sqlx::Error> {
    sqlx::query_as::<_, Province>(
        "SELECT id, code, database, display_name, is_active FROM provinces ORDER BY code",
    )
    .fetch_all(pool)
    .await
}

/// Insert or update a registry row by code. Re-adding a code reactivates it.
pub async fn upsert(
    pool: &PgPool,
    code: &str,
    database: &str,
    display_name: Option<&str>,
) -> Result<Province, sqlx::Error> {
    sqlx::query_as::<_, Province>(
        "INSERT INTO provinces (code, database, display_name, is_active) \
         VALUES ($1, $2, $3, true) \
         ON CONFLICT (code) DO UPDATE \
         SET database = EXCLUDED.database, \
             display_name = COALESCE(EXCLUDED.display_name, provinces.display_name), \
             is_active = true \
         RETURNING id, code, database, display_name, is_active",
    )
    .bind(code)
    .bind(database)
    .bind(display_name)
    .fetch_one(pool)
    .await
}

/// True when the code exists and is active. Used when assigning access.
pub async fn exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT id FROM provinces WHERE code = $1 AND is_active = true")
            .bind(code)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}
