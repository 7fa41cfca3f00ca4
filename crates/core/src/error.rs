//! Error types for the registry client.

/// Result type for registry operations.
pub type CtGovResult<T> = Result<T, CtGovError>;

/// Label used when an upstream failure is rendered as text.
pub const UPSTREAM_SOURCE: &str = "ClinicalTrials.gov API";

/// Error types that can occur when querying the registry.
#[derive(Debug, thiserror::Error)]
pub enum CtGovError {
    /// HTTP request failed before a status line was received, or the body
    /// could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Tool arguments were rejected before any request was built.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CtGovError {
    /// Text shown to the calling agent when a request could not produce an
    /// upstream result.
    pub fn to_result_text(&self) -> String {
        match self {
            Self::Http(e) => format!("Network error: {}", e),
            other => other.to_string(),
        }
    }
}
