use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use resto_order::config;
use resto_order::gateway::HttpGateway;

/// Print the raw JSON the backend returns for one GET path, e.g. `/Meja`.
#[derive(Parser, Debug)]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path below the base URL
    path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = config::load(Some(&args.config))?;
    let gateway = HttpGateway::new(&cfg.backend)?;

    let path = if args.path.starts_with('/') {
        args.path.clone()
    } else {
        format!("/{}", args.path)
    };
    let body = gateway.get_text(&path).await?;
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{body}"),
    }
    Ok(())
}
