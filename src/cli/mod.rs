// Command line operations for the RPT-GIS API.
//
// Server routes go through HTTP; the CLI talks to the directory database
// directly so operators can bootstrap and manage access without a running
// server. `ping` is the exception: it probes a live server over HTTP.

pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rptgis")]
#[command(about = "RPT-GIS API command line interface")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: plain text (default)
    #[arg(long, global = true)]
    pub text: bool,

    /// Output format: JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the directory database and seed an administrator
    Init {
        /// Administrator login name
        #[arg(long)]
        admin_user: String,

        /// Administrator password (8 characters minimum)
        #[arg(long)]
        admin_password: String,
    },

    /// Manage directory user accounts and their access grants
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    /// Manage the province registry used for database routing
    Province {
        #[command(subcommand)]
        cmd: commands::province::ProvinceCommands,
    },

    /// Check that a running server is healthy
    Ping {
        /// Server base URL (defaults to RPTGIS_API_URL or http://127.0.0.1:3000)
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Init {
            admin_user,
            admin_password,
        } => commands::init::handle(admin_user, admin_password, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
        Commands::Province { cmd } => commands::province::handle(cmd, output_format).await,
        Commands::Ping { url } => commands::ping::handle(url, output_format).await,
    }
}
