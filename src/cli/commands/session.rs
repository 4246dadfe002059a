use clap::Subcommand;
use serde_json::json;

use crate::app::AdminApp;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum SessionCommands {
    #[command(about = "Show the session state")]
    Show,
}

pub fn handle(cmd: SessionCommands, app: &AdminApp, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SessionCommands::Show => {
            let state = app.session.snapshot();
            let masked = state.token.as_deref().map(mask_token);

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "authenticated": app.session.is_authenticated(),
                            "token": masked,
                            "user": state.user,
                            "base_url": app.client.base_url(),
                        }))?
                    );
                }
                OutputFormat::Text => {
                    match masked {
                        Some(token) => println!("Token: {}", token),
                        None => println!("No token set"),
                    }
                    match &state.user {
                        Some(user) => println!("User: {}", user),
                        None => println!("No user set"),
                    }
                    println!("API: {}", app.client.base_url());
                }
            }
            Ok(())
        }
    }
}

fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}
