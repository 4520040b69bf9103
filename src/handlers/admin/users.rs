// handlers/admin/users.rs - directory user management

use axum::{extract::Path, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::services::DirectoryService;

#[derive(Debug, Deserialize)]
pub struct AccessUpdateRequest {
    pub provincial_access: Option<String>,
    pub municipal_access: Option<String>,
}

/// GET /api/admin/users - directory users with computed access status
pub async fn list() -> Result<Json<Value>, ApiError> {
    let service = DirectoryService::new().await?;
    let users = service.list_users().await?;
    let total = users.len();
    Ok(Json(json!({ "users": users, "total": total })))
}

/// PUT /api/admin/users/:id/access - assign or clear access fields
///
/// This is the approval step the login and listing messages refer
/// pending users to. Omitted or empty fields clear the grant.
pub async fn set_access(
    Path(user_id): Path<i32>,
    Json(payload): Json<AccessUpdateRequest>,
) -> Result<Json<Value>, ApiError> {
    let service = DirectoryService::new().await?;
    let user = service
        .set_user_access(
            user_id,
            payload.provincial_access.as_deref(),
            payload.municipal_access.as_deref(),
        )
        .await?;
    Ok(Json(json!({ "status": "success", "user": user })))
}
