use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::registry;
use crate::services::DirectoryService;
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand)]
pub enum ProvinceCommands {
    /// Register a province or update its database mapping
    Add {
        /// Province code users are granted (for example "rizal")
        code: String,

        /// PostgreSQL database name the code routes to
        #[arg(long)]
        database: String,

        /// Human-readable name shown in listings
        #[arg(long)]
        display_name: Option<String>,
    },

    /// List registered provinces
    List,
}

pub async fn handle(cmd: ProvinceCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let service = DirectoryService::new().await?;

    match cmd {
        ProvinceCommands::Add {
            code,
            database,
            display_name,
        } => {
            let province = registry::upsert(
                service.pool(),
                code.trim(),
                database.trim(),
                display_name.as_deref(),
            )
            .await?;
            output_success(
                &output_format,
                &format!("Province '{}' routes to '{}'", province.code, province.database),
                Some(json!({ "province": province })),
            )
        }
        ProvinceCommands::List => {
            let provinces = registry::list(service.pool()).await?;
            match output_format {
                OutputFormat::Text => {
                    println!("{:<16} {:<24} {:<8} display_name", "code", "database", "active");
                    for province in &provinces {
                        println!(
                            "{:<16} {:<24} {:<8} {}",
                            province.code,
                            province.database,
                            province.is_active,
                            province.display_name.as_deref().unwrap_or("-"),
                        );
                    }
                    println!("({} provinces)", provinces.len());
                    Ok(())
                }
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("{} provinces", provinces.len()),
                    Some(json!({ "provinces": provinces })),
                ),
            }
        }
    }
}
