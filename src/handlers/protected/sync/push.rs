// handlers/protected/sync/push.rs - POST /api/sync-push

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::require_schema;
use crate::error::ApiError;
use crate::middleware::ProvincialDb;
use crate::services::{MatchStrategy, SyncOutcome, SyncService};

#[derive(Debug, Deserialize)]
pub struct PushRequest {
    pub schema: Option<String>,
    /// "id" (authoritative replace) or "pin" (upsert, no deletes).
    #[serde(default, rename = "match")]
    pub match_strategy: MatchStrategy,
}

/// POST /api/sync-push - replicate the parcel join out to the RPIS side
pub async fn push(
    Extension(db): Extension<ProvincialDb>,
    Json(payload): Json<PushRequest>,
) -> Result<Json<Value>, ApiError> {
    let schema = require_schema(payload.schema.as_deref())?;
    let service = SyncService::new(db.pool.clone(), db.database.clone());

    let body = match service.push(&schema, payload.match_strategy).await? {
        SyncOutcome::Empty { message } => json!({ "status": "empty", "message": message }),
        SyncOutcome::Success { message, count } => {
            json!({ "status": "success", "message": message, "count": count })
        }
    };
    Ok(Json(body))
}
