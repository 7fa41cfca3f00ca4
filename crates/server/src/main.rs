use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod api;
mod config;

use config::AppState;

#[derive(Parser, Debug)]
#[command(name = "ctgov-server")]
#[command(about = "ClinicalTrials.gov MCP server over HTTP", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "ctgov.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "7800")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ctgov=info,tower_http=debug".into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    tracing::info!("Starting ClinicalTrials.gov MCP server");

    let settings = config::load_settings(&args.config)?;
    let state = AppState::new(&settings)?;

    let addr = format!("{}:{}", args.host, args.port);
    api::serve(&addr, state).await
}
