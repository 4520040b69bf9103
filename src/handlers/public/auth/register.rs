// handlers/public/auth/register.rs - POST /api/auth/register

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::DirectoryService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth/register - create a pending directory account
///
/// New accounts carry no access fields; an administrator assigns
/// provincial and municipal access before the account becomes usable.
pub async fn register(Json(payload): Json<RegisterRequest>) -> Result<Json<Value>, ApiError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request("Username is required"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }

    let service = DirectoryService::new().await?;
    let user = service.create_user(username, &payload.password).await?;

    Ok(Json(json!({
        "status": "success",
        "message": format!(
            "Account '{}' created. Access must be assigned by an administrator.",
            user.user_name
        ),
    })))
}
