mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

// The JWT layer answers these without touching any database, so the
// assertions here are exact.

async fn get_list_schemas(auth: Option<&str>) -> Result<(StatusCode, Value)> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let mut req = client.get(format!("{}/api/list-schemas", server.base_url));
    if let Some(value) = auth {
        req = req.header("Authorization", value);
    }
    let res = req.send().await?;
    let status = res.status();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}

#[tokio::test]
async fn missing_authorization_header() -> Result<()> {
    let (status, body) = get_list_schemas(None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true, "unexpected body: {}", body);
    assert_eq!(body["message"], "Missing Authorization header", "unexpected body: {}", body);
    Ok(())
}

#[tokio::test]
async fn non_bearer_authorization_header() -> Result<()> {
    let (status, body) = get_list_schemas(Some("Basic dXNlcjpwYXNz")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"], "Authorization header must use Bearer token format",
        "unexpected body: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn empty_bearer_token() -> Result<()> {
    let (status, body) = get_list_schemas(Some("Bearer ")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Empty JWT token", "unexpected body: {}", body);
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_invalid() -> Result<()> {
    let (status, body) = get_list_schemas(Some("Bearer not.a.jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token.", "unexpected body: {}", body);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> Result<()> {
    let token = common::expired_token();
    let (status, body) = get_list_schemas(Some(&format!("Bearer {}", token))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token has expired.", "unexpected body: {}", body);
    Ok(())
}

#[tokio::test]
async fn admin_token_rejected_on_provincial_routes() -> Result<()> {
    // Provincial routing is for directory users; admins manage, not browse.
    let token = common::admin_token();
    let (status, body) = get_list_schemas(Some(&format!("Bearer {}", token))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"], "Admins not allowed for this route.",
        "unexpected body: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn valid_token_reaches_directory_lookup() -> Result<()> {
    // Past the JWT layer the middleware re-reads the user row. The minted
    // principal does not exist, so with a live directory this is 401; with
    // no database (or an uninitialized one) it degrades to 503 or 500.
    let token = common::user_token();
    let (status, body) = get_list_schemas(Some(&format!("Bearer {}", token))).await?;
    assert!(
        status == StatusCode::UNAUTHORIZED
            || status == StatusCode::SERVICE_UNAVAILABLE
            || status == StatusCode::INTERNAL_SERVER_ERROR,
        "expected 401, 503 or 500, got {}: {}",
        status,
        body
    );
    assert_eq!(body["error"], true, "unexpected body: {}", body);
    Ok(())
}
