//! Configuration for the upstream registry client.

use crate::error::{CtGovError, CtGovResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://clinicaltrials.gov/api/v2";

/// Top-level configuration file (`ctgov.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Connection settings for the registry API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL that `/studies` is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout applied by the HTTP client.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("ctgov-mcp/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse `base_url`, rejecting URLs that cannot carry path segments.
    pub fn parsed_base_url(&self) -> CtGovResult<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(CtGovError::Config(format!(
                "base_url cannot be used as a base: {}",
                self.base_url
            )));
        }
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CtGovError::Config(format!(
                "base_url must be http or https, got: {}",
                url.scheme()
            )));
        }
        Ok(url)
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> CtGovResult<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            CtGovError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> CtGovResult<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| CtGovError::Config(format!("failed to parse configuration: {}", e)))?;
        settings.upstream.parsed_base_url()?;
        Ok(settings)
    }

    /// Replace the upstream base URL when an override is present.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.upstream.base_url = base_url;
        }
        self
    }
}
