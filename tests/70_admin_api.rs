mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn admin_routes_require_authentication() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/admin/users", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Missing Authorization header", "unexpected body: {}", body);

    Ok(())
}

#[tokio::test]
async fn user_token_cannot_reach_admin_routes() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::user_token();

    // The gate checks the claim type before touching the directory, so this
    // is exact even without a database.
    let res = client
        .put(format!("{}/api/admin/users/1/access", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "provincial_access": "rizal" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Admin access required.", "unexpected body: {}", body);

    Ok(())
}

#[tokio::test]
async fn admin_token_is_verified_against_directory() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::admin_token();

    // The minted admin id has no directory row: 401 with a live directory,
    // 500/503 without one.
    let res = client
        .get(format!("{}/api/admin/users", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

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
        assert_eq!(body["message"], "Admin not found.", "unexpected body: {}", body);
    }

    Ok(())
}
