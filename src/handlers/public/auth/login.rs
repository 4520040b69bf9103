// handlers/public/auth/login.rs - POST /api/auth/login

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::access::AccessStatus;
use crate::auth::{self, Claims, UserType};
use crate::error::ApiError;
use crate::services::DirectoryService;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_type: UserType,
}

/// POST /api/auth/login - authenticate against the directory and issue a JWT
///
/// Users are checked before admins. A user with no provincial assignment is
/// rejected here so the client shows the access message instead of an empty
/// workspace. Invalid name and invalid password answer identically.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let service = DirectoryService::new().await?;

    if let Some(user) = service.find_user_by_name(username).await? {
        if !auth::verify_password(&payload.password, &user.password_hash) {
            tracing::warn!("Failed login for user '{}'", username);
            return Err(ApiError::unauthorized("Incorrect username or password"));
        }

        let status = AccessStatus::evaluate(
            user.provincial_access.as_deref(),
            user.municipal_access.as_deref(),
        );
        if status == AccessStatus::NoAccess {
            return Err(ApiError::forbidden(status.message().unwrap_or_default()));
        }

        let token = issue_token(user.id, UserType::User, user.user_name)?;
        return Ok(Json(LoginResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user_type: UserType::User,
        }));
    }

    if let Some(admin) = service.find_admin_by_name(username).await? {
        if !auth::verify_password(&payload.password, &admin.password_hash) {
            tracing::warn!("Failed login for admin '{}'", username);
            return Err(ApiError::unauthorized("Incorrect username or password"));
        }

        let token = issue_token(admin.id, UserType::Admin, admin.user_name)?;
        return Ok(Json(LoginResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user_type: UserType::Admin,
        }));
    }

    Err(ApiError::unauthorized("Incorrect username or password"))
}

fn issue_token(user_id: i32, user_type: UserType, user_name: String) -> Result<String, ApiError> {
    let claims = Claims::new(user_id, user_type, user_name);
    auth::generate_jwt(&claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Could not issue token")
    })
}
