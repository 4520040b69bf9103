use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;

use crate::auth::{self, UserType};
use crate::config;
use crate::error::ApiError;

/// Authenticated principal extracted from a verified JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub user_type: UserType,
    pub user_name: String,
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    // Validate and decode JWT
    let claims = validate_jwt(&token).map_err(ApiError::unauthorized)?;

    let auth_user = AuthUser {
        user_id: claims.user_id,
        user_type: claims.user_type,
        user_name: claims.user_name,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Gate for the /api/admin tier. Requires an admin principal and confirms
/// the directory row still exists.
pub async fn admin_gate_middleware(
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required"))?
        .clone();

    if auth_user.user_type != UserType::Admin {
        return Err(ApiError::forbidden("Admin access required."));
    }

    let pool = crate::database::DatabaseManager::directory_pool().await?;
    let found: Option<i32> = sqlx::query_scalar("SELECT id FROM admins WHERE id = $1")
        .bind(auth_user.user_id)
        .fetch_optional(&pool)
        .await?;

    if found.is_none() {
        tracing::warn!("Token for missing admin id {}", auth_user.user_id);
        return Err(ApiError::unauthorized("Admin not found."));
    }

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<auth::Claims, String> {
    if config::config().security.jwt_secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    auth::decode_jwt(token).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => "Token has expired.".to_string(),
        _ => "Invalid token.".to_string(),
    })
}
