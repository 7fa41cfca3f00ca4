//! HTTP client for the ClinicalTrials.gov v2 API.

use crate::config::UpstreamConfig;
use crate::error::{CtGovResult, UPSTREAM_SOURCE};
use crate::params::StudySearch;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// Outcome of one upstream GET that produced an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResult {
    /// 2xx response; the body is passed through untouched.
    Success(serde_json::Value),
    /// 2xx response whose body is not JSON, e.g. `format=csv`.
    Raw(String),
    /// Non-2xx response.
    Failure(UpstreamFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    pub body: String,
}

impl UpstreamResult {
    /// Render as the text block returned to the calling agent.
    pub fn into_text(self) -> String {
        match self {
            Self::Success(payload) => {
                serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
            }
            Self::Raw(body) => body,
            Self::Failure(failure) => failure.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }
}

impl std::fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error: {} {}\n{}",
            UPSTREAM_SOURCE, self.status, self.status_text, self.body
        )
    }
}

/// Registry client. Cheap to clone; holds no per-request state.
#[derive(Debug, Clone)]
pub struct CtGovClient {
    client: Client,
    base_url: Url,
}

impl CtGovClient {
    pub fn new(config: &UpstreamConfig) -> CtGovResult<Self> {
        let base_url = config.parsed_base_url()?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `parsed_base_url` already rejected cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of the list endpoint for a validated search.
    pub fn studies_url(&self, search: &StudySearch) -> Url {
        let mut url = self.endpoint(&["studies"]);
        url.query_pairs_mut().extend_pairs(search.query_pairs());
        url
    }

    /// URL of a single study. The identifier is percent-encoded as one path
    /// segment and no query string is attached.
    pub fn study_url(&self, nct_id: &str) -> Url {
        self.endpoint(&["studies", nct_id])
    }

    pub async fn list_studies(&self, search: &StudySearch) -> CtGovResult<UpstreamResult> {
        self.fetch(self.studies_url(search)).await
    }

    pub async fn get_study(&self, nct_id: &str) -> CtGovResult<UpstreamResult> {
        self.fetch(self.study_url(nct_id)).await
    }

    /// Issue one GET. Non-2xx statuses are returned as
    /// [`UpstreamResult::Failure`]; only transport errors are `Err`.
    pub async fn fetch(&self, url: Url) -> CtGovResult<UpstreamResult> {
        debug!(url = %url, "GET request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned error status");
            return Ok(UpstreamResult::Failure(UpstreamFailure {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            }));
        }

        match serde_json::from_str(&body) {
            Ok(payload) => Ok(UpstreamResult::Success(payload)),
            Err(_) => Ok(UpstreamResult::Raw(body)),
        }
    }
}
