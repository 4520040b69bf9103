use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::services::DirectoryService;
use serde_json::json;

/// Create the directory tables and seed (or re-key) an administrator.
///
/// Safe to run repeatedly: the schema statements are idempotent and an
/// existing administrator just gets a fresh password hash.
pub async fn handle(
    admin_user: String,
    admin_password: String,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let admin_user = admin_user.trim();
    if admin_user.is_empty() {
        anyhow::bail!("Admin username is required");
    }
    if admin_password.len() < 8 {
        anyhow::bail!("Admin password must be at least 8 characters");
    }

    let service = DirectoryService::new().await?;
    service.ensure_directory_schema().await?;
    let admin = service.upsert_admin(admin_user, &admin_password).await?;

    output_success(
        &output_format,
        &format!("Directory initialized, administrator '{}' ready", admin.user_name),
        Some(json!({
            "admin_id": admin.id,
            "admin_user": admin.user_name,
        })),
    )
}
