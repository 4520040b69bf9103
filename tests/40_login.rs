mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn login_rejects_blank_credentials() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "  ", "password": "" }))
        .send()
        .await?;

    // Validation runs before any database work, so this is exact.
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true, "unexpected body: {}", body);
    assert_eq!(
        body["message"], "Username and password are required",
        "unexpected body: {}",
        body
    );

    Ok(())
}

#[tokio::test]
async fn login_without_body_is_client_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .send()
        .await?;

    assert!(
        res.status().is_client_error(),
        "expected client error, got {}",
        res.status()
    );

    Ok(())
}

#[tokio::test]
async fn login_with_unknown_user() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "username": "no_such_user_xyzzy", "password": "whatever123" }))
        .send()
        .await?;

    // 401 with a live directory; 500/503 when the directory is missing.
    let status = res.status();
    assert!(
        status == StatusCode::UNAUTHORIZED
            || status == StatusCode::INTERNAL_SERVER_ERROR
            || status == StatusCode::SERVICE_UNAVAILABLE,
        "expected 401, 500 or 503, got {}",
        status
    );

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true, "unexpected body: {}", body);
    if status == StatusCode::UNAUTHORIZED {
        assert_eq!(
            body["message"], "Incorrect username or password",
            "unexpected body: {}",
            body
        );
    }

    Ok(())
}

#[tokio::test]
async fn register_requires_a_username() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({ "username": "", "password": "longenough" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Username is required", "unexpected body: {}", body);

    Ok(())
}

#[tokio::test]
async fn register_enforces_password_length() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({ "username": "newuser", "password": "short" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(
        body["message"], "Password must be at least 8 characters",
        "unexpected body: {}",
        body
    );

    Ok(())
}
