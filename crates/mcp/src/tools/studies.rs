// Registry query tools: list_studies, get_study, specific_fields_in_study

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_integer, json_schema_object, json_schema_string, with_default, Tool};
use anyhow::Result;
use ctgov_core::params::{DEFAULT_COUNT_TOTAL, DEFAULT_FORMAT, DEFAULT_PAGE_SIZE};
use ctgov_core::{
    CtGovClient, CtGovResult, GetStudyParams, ListStudiesParams, SpecificFieldsParams,
    UpstreamResult,
};
use std::sync::Arc;

/// Fold an upstream outcome into a tool result. Upstream and network
/// failures stay plain text, with no error flag.
fn into_call_result(outcome: CtGovResult<UpstreamResult>) -> CallToolResult {
    match outcome {
        Ok(result) => CallToolResult::text(result.into_text()),
        Err(e) => {
            tracing::warn!(error = %e, "Upstream request failed");
            CallToolResult::text(e.to_result_text())
        }
    }
}

/// Properties shared by the two list-endpoint tools. `fields` is added by
/// each tool since only its requiredness differs.
fn search_properties(fields_description: &str) -> serde_json::Value {
    serde_json::json!({
        "cond": json_schema_string("Condition or disease to search for, e.g. \"lung cancer\""),
        "term": json_schema_string("Additional free-text search terms"),
        "locn": json_schema_string("Location (city, state, country or facility name)"),
        "overallStatus": json_schema_string(
            "Filter by overall status, e.g. RECRUITING or COMPLETED. Separate several with '|'"
        ),
        "pageSize": with_default(
            json_schema_integer("Number of studies per page"),
            DEFAULT_PAGE_SIZE,
        ),
        "format": with_default(json_schema_string("Response format (json or csv)"), DEFAULT_FORMAT),
        "fields": json_schema_string(fields_description),
        "countTotal": with_default(
            json_schema_string("Whether to include the total study count (\"true\" or \"false\")"),
            DEFAULT_COUNT_TOTAL,
        ),
        "pageToken": json_schema_string("Token from a previous response's nextPageToken"),
    })
}

/// Search studies by condition with optional filters
pub struct ListStudiesTool {
    client: Arc<CtGovClient>,
}

impl ListStudiesTool {
    pub fn new(client: Arc<CtGovClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListStudiesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_studies".to_string(),
            description: "Search ClinicalTrials.gov for studies matching a condition, with optional \
                          term, location and status filters. Returns the raw API response."
                .to_string(),
            input_schema: json_schema_object(
                search_properties("Comma-separated list of fields to return"),
                vec!["cond"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let search = ListStudiesParams::from_arguments(arguments)?.into_search();
        Ok(into_call_result(self.client.list_studies(&search).await))
    }
}

/// Fetch one study by NCT identifier
pub struct GetStudyTool {
    client: Arc<CtGovClient>,
}

impl GetStudyTool {
    pub fn new(client: Arc<CtGovClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetStudyTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_study".to_string(),
            description: "Get the full record of a single study by its NCT identifier.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "nct_id": json_schema_string("NCT identifier of the study, e.g. NCT04267848")
                }),
                vec!["nct_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let params = GetStudyParams::from_arguments(arguments)?;
        Ok(into_call_result(self.client.get_study(&params.nct_id).await))
    }
}

/// Same search as `list_studies`, but the caller must name the fields
pub struct SpecificFieldsInStudyTool {
    client: Arc<CtGovClient>,
}

impl SpecificFieldsInStudyTool {
    pub fn new(client: Arc<CtGovClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for SpecificFieldsInStudyTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "specific_fields_in_study".to_string(),
            description: "Search studies by condition and return only the requested fields, \
                          e.g. NCTId,BriefTitle,OverallStatus."
                .to_string(),
            input_schema: json_schema_object(
                search_properties("Comma-separated list of fields to return (required)"),
                vec!["cond", "fields"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let search = SpecificFieldsParams::from_arguments(arguments)?.into_search();
        Ok(into_call_result(self.client.list_studies(&search).await))
    }
}
