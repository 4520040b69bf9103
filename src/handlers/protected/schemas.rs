// handlers/protected/schemas.rs - GET /api/list-schemas

use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::access::{self, AccessStatus};
use crate::database::ident::SYSTEM_SCHEMAS;
use crate::error::ApiError;
use crate::middleware::ProvincialDb;

/// GET /api/list-schemas - municipal schemas visible to the routed user
///
/// Lists the province database's schemata minus the system deny list,
/// then filters by the user's municipal grant. Users whose municipal
/// access has not been assigned yet get the pending message instead.
pub async fn list_schemas(Extension(db): Extension<ProvincialDb>) -> Result<Json<Value>, ApiError> {
    let status = AccessStatus::evaluate(Some(&db.provincial), db.municipal.as_deref());
    if status != AccessStatus::Approved {
        return Err(ApiError::forbidden(status.message().unwrap_or_default()));
    }
    let municipal = db.municipal.clone().unwrap_or_default();

    let deny: Vec<String> = SYSTEM_SCHEMAS.iter().map(|s| s.to_string()).collect();
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT schema_name::text FROM information_schema.schemata \
         WHERE schema_name::text <> ALL($1) \
           AND schema_name NOT LIKE 'pg\\_%' \
           AND schema_name NOT ILIKE '%credential%' \
         ORDER BY schema_name",
    )
    .bind(&deny)
    .fetch_all(&db.pool)
    .await?;

    let schemas = access::filter_schemas(names, &municipal);
    let total = schemas.len();

    Ok(Json(json!({
        "schemas": schemas,
        "total_accessible": total,
        "user_access": {
            "provincial": db.provincial,
            "municipal": municipal,
            "description": access::describe_access(&db.provincial, &municipal),
            "actual_dbname": db.database,
        }
    })))
}
