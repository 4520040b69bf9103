use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::services::DirectoryService;
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user account (access is assigned separately)
    Add {
        /// Login name for the new account
        user_name: String,

        /// Password (8 characters minimum)
        #[arg(long)]
        password: String,
    },

    /// List user accounts with their access status
    List,

    /// Assign or clear a user's provincial and municipal access
    Access {
        /// Directory id of the user
        id: i32,

        /// Province code from the registry (omit to leave pending)
        #[arg(long)]
        provincial: Option<String>,

        /// Municipal grant: ALL, or a comma-separated list of schemas
        #[arg(long)]
        municipal: Option<String>,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let service = DirectoryService::new().await?;

    match cmd {
        UserCommands::Add { user_name, password } => {
            if password.len() < 8 {
                anyhow::bail!("Password must be at least 8 characters");
            }
            let user = service.create_user(user_name.trim(), &password).await?;
            output_success(
                &output_format,
                &format!("User '{}' created", user.user_name),
                Some(json!({ "id": user.id })),
            )
        }
        UserCommands::List => {
            let users = service.list_users().await?;
            match output_format {
                OutputFormat::Text => {
                    println!(
                        "{:>5}  {:<24} {:<18} {:<16} municipal",
                        "id", "user_name", "status", "provincial"
                    );
                    for user in &users {
                        println!(
                            "{:>5}  {:<24} {:<18} {:<16} {}",
                            user.id,
                            user.user_name,
                            user.status,
                            user.provincial_access.as_deref().unwrap_or("-"),
                            user.municipal_access.as_deref().unwrap_or("-"),
                        );
                    }
                    println!("({} users)", users.len());
                    Ok(())
                }
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("{} users", users.len()),
                    Some(json!({ "users": users })),
                ),
            }
        }
        UserCommands::Access {
            id,
            provincial,
            municipal,
        } => {
            let user = service
                .set_user_access(id, provincial.as_deref(), municipal.as_deref())
                .await?;
            output_success(
                &output_format,
                &format!("Access updated for '{}' ({})", user.user_name, user.status),
                Some(json!({ "user": user })),
            )
        }
    }
}
