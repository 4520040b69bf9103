// handlers/protected/sync/pull.rs - POST /api/sync-pull

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::require_schema;
use crate::error::ApiError;
use crate::middleware::ProvincialDb;
use crate::services::{SyncOutcome, SyncService};

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub schema: Option<String>,
}

/// POST /api/sync-pull - bring RPIS-side columns back into the GIS table
pub async fn pull(
    Extension(db): Extension<ProvincialDb>,
    Json(payload): Json<PullRequest>,
) -> Result<Json<Value>, ApiError> {
    let schema = require_schema(payload.schema.as_deref())?;
    let service = SyncService::new(db.pool.clone(), db.database.clone());

    let body = match service.pull(&schema).await? {
        SyncOutcome::Empty { message } => json!({ "status": "empty", "message": message }),
        SyncOutcome::Success { message, count } => {
            json!({ "status": "success", "message": message, "updated": count })
        }
    };
    Ok(Json(body))
}
