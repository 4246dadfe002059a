use std::path::PathBuf;

use clap::Subcommand;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::{json, Value};

use crate::api::{MaterialForm, MaterialUploadResponse, UploadOptions};
use crate::app::AdminApp;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum MaterialCommands {
    #[command(about = "List materials")]
    List {
        #[arg(long = "param", value_parser = parse_key_value, help = "Query parameter as key=value (repeatable)")]
        params: Vec<(String, String)>,
    },

    #[command(about = "Upload a material file")]
    Upload {
        #[arg(help = "File to upload")]
        file: PathBuf,
        #[arg(long, help = "Free-form metadata sent with the file")]
        metadata: Option<String>,
        #[arg(long, help = "MIME type of the file part")]
        mime: Option<String>,
        #[arg(long = "header", value_parser = parse_header, help = "Extra request header as 'Name: value' (repeatable)")]
        headers: Vec<(HeaderName, HeaderValue)>,
    },

    #[command(about = "Delete a material")]
    Delete {
        #[arg(help = "Material ID")]
        id: String,
    },
}

pub async fn handle(cmd: MaterialCommands, app: &AdminApp, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        MaterialCommands::List { params } => {
            let body: Value = app.client.materials().list_materials(&params_object(params)).await?;

            let empty = body
                .get("items")
                .and_then(Value::as_array)
                .map_or(false, |items| items.is_empty());
            if empty {
                return output_empty_collection(&output_format, "items", "No materials found");
            }
            output_json(&body)
        }
        MaterialCommands::Upload { file, metadata, mime, headers } => {
            let mut form = MaterialForm::from_path(&file).await?;
            if let Some(metadata) = metadata {
                form = form.with_metadata(metadata);
            }
            if let Some(mime) = mime {
                form = form.with_mime(mime);
            }

            let mut options = UploadOptions::default().on_upload_progress(|progress| {
                tracing::debug!(
                    "uploaded {}/{} bytes ({:.0}%)",
                    progress.loaded,
                    progress.total,
                    progress.fraction() * 100.0
                );
            });
            for (name, value) in headers {
                options = options.header(name, value);
            }

            let file_name = form.file_name.clone();
            let uploaded: MaterialUploadResponse = app.client.materials().upload_material(form, options).await?;
            tracing::info!("material {} uploaded as {}", file_name, uploaded.material_id);

            output_success(
                &output_format,
                &format!("Uploaded {} as {} ({})", uploaded.filename, uploaded.material_id, uploaded.status),
                Some(serde_json::to_value(&uploaded)?),
            )
        }
        MaterialCommands::Delete { id } => {
            let body: Value = app.client.materials().delete_material(&id).await?;
            output_success(
                &output_format,
                &format!("Material '{}' deleted", id),
                Some(json!({ "material_id": id, "body": body })),
            )
        }
    }
}
