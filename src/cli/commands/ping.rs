use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use serde_json::{json, Value};

/// Probe a running server's health endpoint.
pub async fn handle(url: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = url
        .or_else(|| std::env::var("RPTGIS_API_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:3000".to_string());
    let endpoint = format!("{}/health", base.trim_end_matches('/'));

    let client = reqwest::Client::new();
    let response = client.get(&endpoint).send().await?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            &output_format,
            &format!("Server healthy at {}", endpoint),
            Some(json!({ "health": body })),
        )
    } else {
        output_error(
            &output_format,
            &format!("Server degraded at {} (HTTP {})", endpoint, status.as_u16()),
        )?;
        anyhow::bail!("health check returned HTTP {}", status.as_u16());
    }
}
