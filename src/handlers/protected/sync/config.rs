// handlers/protected/sync/config.rs - GET/POST /api/sync-config

use axum::{extract::Query, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{require_field, require_schema};
use crate::error::ApiError;
use crate::middleware::ProvincialDb;
use crate::services::SyncService;

#[derive(Debug, Deserialize)]
pub struct SyncConfigQuery {
    pub schema: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveCredsRequest {
    pub schema: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// GET /api/sync-config?schema=S - latest stored RPIS credentials
pub async fn get_sync_config(
    Extension(db): Extension<ProvincialDb>,
    Query(query): Query<SyncConfigQuery>,
) -> Result<Json<Value>, ApiError> {
    let schema = require_schema(query.schema.as_deref())?;
    let service = SyncService::new(db.pool.clone(), db.database.clone());

    match service.latest_creds(&schema).await? {
        Some(creds) => Ok(Json(json!({
            "status": "success",
            "host": creds.host,
            "port": creds.port,
            "username": creds.username,
            "password": creds.password.unwrap_or_default(),
        }))),
        None => Ok(Json(json!({
            "status": "empty",
            "message": format!("No SyncCreds found in {}", schema),
        }))),
    }
}

/// POST /api/sync-config - append a credentials row for a schema
///
/// Rows are append-only; the newest one wins on lookup.
pub async fn post_sync_config(
    Extension(db): Extension<ProvincialDb>,
    Json(payload): Json<SaveCredsRequest>,
) -> Result<Json<Value>, ApiError> {
    let schema = require_schema(payload.schema.as_deref())?;
    let host = require_field(payload.host.as_deref())?;
    let port = require_field(payload.port.as_deref())?;
    let username = require_field(payload.username.as_deref())?;

    let service = SyncService::new(db.pool.clone(), db.database.clone());
    service
        .save_creds(&schema, &host, &port, &username, payload.password.as_deref())
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Credentials saved successfully.",
    })))
}
