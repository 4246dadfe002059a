use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::router;

#[derive(Subcommand)]
pub enum RouteCommands {
    #[command(about = "List console routes")]
    List,

    #[command(about = "Resolve a path to its page")]
    Resolve {
        #[arg(help = "Location, e.g. /devices or /commands?limit=20")]
        path: String,
    },
}

pub fn handle(cmd: RouteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RouteCommands::List => {
            match output_format {
                OutputFormat::Json => {
                    let routes: Vec<_> = router::routes().collect();
                    println!("{}", serde_json::to_string_pretty(&json!({ "routes": routes }))?);
                }
                OutputFormat::Text => {
                    for route in router::routes() {
                        println!("{:<12} {:<12} {:?}", route.path, route.name, route.view);
                    }
                }
            }
            Ok(())
        }
        RouteCommands::Resolve { path } => {
            let route = router::resolve(&path).ok_or_else(|| anyhow::anyhow!("No route matches '{}'", path))?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "location": path, "route": route }))?);
                }
                OutputFormat::Text => {
                    println!("{} -> {} ({:?})", path, route.name, route.view);
                }
            }
            Ok(())
        }
    }
}
