pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::app::AdminApp;
use crate::config::AdminConfig;

#[derive(Parser)]
#[command(name = "signage-admin")]
#[command(about = "Signage admin CLI - devices commands, materials and console routes")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "ADMIN_TOKEN", hide_env_values = true, help = "Auth token to keep in the session")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Send and list device commands")]
    Command {
        #[command(subcommand)]
        cmd: commands::command::CommandCommands,
    },

    #[command(about = "Material library management")]
    Material {
        #[command(subcommand)]
        cmd: commands::material::MaterialCommands,
    },

    #[command(about = "Admin console route table")]
    Route {
        #[command(subcommand)]
        cmd: commands::route::RouteCommands,
    },

    #[command(about = "Session state")]
    Session {
        #[command(subcommand)]
        cmd: commands::session::SessionCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
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

pub async fn run(cli: Cli, config: &AdminConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let app = AdminApp::from_config(config)?;
    if let Some(token) = cli.token {
        // Kept in the session only; the auth interceptor does not send it yet
        app.session.set_token(Some(token));
        tracing::debug!("session token set from command line");
    }

    match cli.command {
        Commands::Command { cmd } => commands::command::handle(cmd, &app, output_format).await,
        Commands::Material { cmd } => commands::material::handle(cmd, &app, output_format).await,
        Commands::Route { cmd } => commands::route::handle(cmd, output_format),
        Commands::Session { cmd } => commands::session::handle(cmd, &app, output_format),
    }
}
