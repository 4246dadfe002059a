use clap::Subcommand;
use serde_json::json;

use crate::api::{CommandList, CommandListParams, CommandPayload};
use crate::app::AdminApp;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum CommandCommands {
    #[command(about = "Send a command to a device")]
    Send {
        #[arg(help = "Action, e.g. capture, reboot, set_volume")]
        action: String,
        #[arg(help = "Target device ID")]
        device: String,
        #[arg(long, help = "Command ID (generated if omitted)")]
        cmd_id: Option<String>,
        #[arg(long = "param", value_parser = parse_key_value, help = "Extra payload field as key=value (repeatable)")]
        params: Vec<(String, String)>,
    },

    #[command(about = "List recently sent commands")]
    List {
        #[arg(long, help = "Maximum number of commands to return")]
        limit: Option<u32>,
    },
}

pub async fn handle(cmd: CommandCommands, app: &AdminApp, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CommandCommands::Send { action, device, cmd_id, params } => {
            let mut payload = CommandPayload::new(&action, &device);
            payload = match cmd_id {
                Some(id) => payload.with_cmd_id(id),
                None => payload.with_generated_id(),
            };
            for (key, value) in params {
                payload = payload.with_field(key, json_or_string(&value));
            }

            let response = app.client.commands().send_command(&payload).await?;
            tracing::info!("command {} sent to {} ({})", action, device, response.status);

            output_success(
                &output_format,
                &format!("Command '{}' sent to {} (HTTP {})", action, device, response.status.as_u16()),
                Some(json!({
                    "status": response.status.as_u16(),
                    "body": response.data,
                })),
            )
        }
        CommandCommands::List { limit } => {
            let response = app.client.commands().list_commands(&CommandListParams { limit }).await?;

            if let OutputFormat::Json = output_format {
                return output_json(&json!({
                    "status": response.status.as_u16(),
                    "body": response.data,
                }));
            }

            let list: CommandList = response.into_data()?;
            if list.items.is_empty() {
                return output_empty_collection(&output_format, "commands", "No commands sent yet");
            }

            println!("{:<38} {:<16} {:<12} {:<10} SENT", "CMD ID", "DEVICE", "ACTION", "STATUS");
            for item in &list.items {
                let sent = item
                    .sent_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| item.send_ts.to_string());
                println!(
                    "{:<38} {:<16} {:<12} {:<10} {}",
                    item.cmd_id,
                    item.device_id.as_deref().unwrap_or("-"),
                    item.action.as_deref().unwrap_or("-"),
                    item.status,
                    sent
                );
            }
            println!("{} of {} commands", list.items.len(), list.total);
            Ok(())
        }
    }
}
