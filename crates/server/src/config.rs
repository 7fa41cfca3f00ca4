use anyhow::{Context, Result};
use ctgov_core::{CtGovClient, Settings};
use ctgov_mcp::tools::default_registry;
use ctgov_mcp::McpServer;
use std::path::Path;
use std::sync::Arc;

/// Load `ctgov.toml` (defaults when absent) and apply `CTGOV_BASE_URL`.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let settings = Settings::load(path).context("Failed to load configuration")?;
    Ok(settings.with_base_url_override(std::env::var("CTGOV_BASE_URL").ok()))
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mcp: Arc<McpServer>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client =
            CtGovClient::new(&settings.upstream).context("Failed to create HTTP client")?;
        tracing::info!(base_url = %client.base_url(), "Using registry API");

        let mcp = McpServer::new(default_registry(Arc::new(client)));
        Ok(Self { mcp: Arc::new(mcp) })
    }
}
