// Standalone MCP server binary (stdio transport)

use anyhow::{Context, Result};
use ctgov_core::{CtGovClient, Settings};
use ctgov_mcp::server::McpServer;
use ctgov_mcp::tools::default_registry;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // stdout carries protocol frames only; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ctgov=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        tracing::error!("ctgov-mcp failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing::info!("ctgov MCP server starting...");

    let config_path =
        PathBuf::from(std::env::var("CTGOV_CONFIG").unwrap_or_else(|_| "ctgov.toml".to_string()));
    let settings = Settings::load(&config_path)
        .context("Failed to load configuration")?
        .with_base_url_override(std::env::var("CTGOV_BASE_URL").ok());

    let client = CtGovClient::new(&settings.upstream).context("Failed to create HTTP client")?;
    tracing::info!(base_url = %client.base_url(), "Using registry API");

    let server = McpServer::new(default_registry(Arc::new(client)));
    server.start().await
}
