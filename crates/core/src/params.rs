//! Validated parameter sets for the three registry queries.
//!
//! Each tool deserializes its JSON arguments into one of these structs.
//! Optional parameters are `Option`s, defaulted ones carry their default
//! through `#[serde(default = ...)]`, so a struct that deserialized and
//! passed `validate` is always ready to be turned into a request URL.

use crate::error::{CtGovError, CtGovResult};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_FORMAT: &str = "json";
pub const DEFAULT_COUNT_TOTAL: &str = "true";

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_count_total() -> String {
    DEFAULT_COUNT_TOTAL.to_string()
}

/// Search options shared by `list_studies` and `specific_fields_in_study`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub term: Option<String>,

    #[serde(default)]
    pub locn: Option<String>,

    #[serde(rename = "overallStatus", default)]
    pub overall_status: Option<String>,

    #[serde(
        rename = "pageSize",
        default = "default_page_size",
        deserialize_with = "lenient_u32"
    )]
    pub page_size: u32,

    #[serde(default = "default_format", deserialize_with = "text_or_default_format")]
    pub format: String,

    #[serde(
        rename = "countTotal",
        default = "default_count_total",
        deserialize_with = "text_or_default_count_total"
    )]
    pub count_total: String,

    #[serde(rename = "pageToken", default)]
    pub page_token: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            term: None,
            locn: None,
            overall_status: None,
            page_size: DEFAULT_PAGE_SIZE,
            format: default_format(),
            count_total: default_count_total(),
            page_token: None,
        }
    }
}

/// Arguments of `list_studies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStudiesParams {
    pub cond: String,

    #[serde(default)]
    pub fields: Option<String>,

    #[serde(flatten)]
    pub options: SearchOptions,
}

/// Arguments of `specific_fields_in_study`. Same endpoint as
/// `list_studies`, but `fields` is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificFieldsParams {
    pub cond: String,

    pub fields: String,

    #[serde(flatten)]
    pub options: SearchOptions,
}

/// Arguments of `get_study`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStudyParams {
    pub nct_id: String,
}

/// A fully validated list-endpoint query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySearch {
    pub cond: String,
    pub fields: Option<String>,
    pub options: SearchOptions,
}

impl StudySearch {
    /// Query-string pairs in the order they are appended to the URL.
    /// Absent optional values produce no pair.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query.cond", self.cond.clone())];

        let optional = [
            ("query.term", &self.options.term),
            ("query.locn", &self.options.locn),
            ("filter.overallStatus", &self.options.overall_status),
            ("fields", &self.fields),
            ("pageToken", &self.options.page_token),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }

        pairs.push(("pageSize", self.options.page_size.to_string()));
        pairs.push(("format", self.options.format.clone()));
        pairs.push(("countTotal", self.options.count_total.clone()));
        pairs
    }
}

/// Deserialize tool arguments, mapping schema violations to `InvalidInput`.
fn from_arguments<T: serde::de::DeserializeOwned>(arguments: serde_json::Value) -> CtGovResult<T> {
    let arguments = if arguments.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| CtGovError::InvalidInput(e.to_string()))
}

fn require_non_empty(name: &str, value: &str) -> CtGovResult<()> {
    if value.trim().is_empty() {
        return Err(CtGovError::InvalidInput(format!("{} must not be empty", name)));
    }
    Ok(())
}

impl ListStudiesParams {
    pub fn from_arguments(arguments: serde_json::Value) -> CtGovResult<Self> {
        let params: Self = from_arguments(arguments)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> CtGovResult<()> {
        require_non_empty("cond", &self.cond)
    }

    pub fn into_search(self) -> StudySearch {
        StudySearch {
            cond: self.cond,
            fields: self.fields,
            options: self.options,
        }
    }
}

impl SpecificFieldsParams {
    pub fn from_arguments(arguments: serde_json::Value) -> CtGovResult<Self> {
        let params: Self = from_arguments(arguments)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> CtGovResult<()> {
        require_non_empty("cond", &self.cond)?;
        require_non_empty("fields", &self.fields)
    }

    pub fn into_search(self) -> StudySearch {
        StudySearch {
            cond: self.cond,
            fields: Some(self.fields),
            options: self.options,
        }
    }
}

impl GetStudyParams {
    pub fn from_arguments(arguments: serde_json::Value) -> CtGovResult<Self> {
        let params: Self = from_arguments(arguments)?;
        require_non_empty("nct_id", &params.nct_id)?;
        // Dot segments would be resolved away and hit the list endpoint.
        if matches!(params.nct_id.as_str(), "." | "..") {
            return Err(CtGovError::InvalidInput(format!(
                "nct_id is not a valid identifier: {:?}",
                params.nct_id
            )));
        }
        Ok(params)
    }
}

// Coercions: agents regularly send numbers as strings and booleans for
// text flags. `null` is treated like an absent value.

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrBool {
    Text(String),
    Bool(bool),
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match &value {
        None | Some(serde_json::Value::Null) => return Ok(DEFAULT_PAGE_SIZE),
        Some(serde_json::Value::Number(n)) => n.as_u64().or_else(|| {
            // 5.0 is an integer as far as JSON Schema is concerned
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
                .map(|f| f as u64)
        }),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            let shown = value.map(|v| v.to_string()).unwrap_or_default();
            serde::de::Error::custom(format!(
                "pageSize must be a non-negative integer, got {}",
                shown
            ))
        })
}

fn lenient_text<'de, D: Deserializer<'de>>(
    deserializer: D,
    default: fn() -> String,
) -> Result<String, D::Error> {
    Ok(match Option::<TextOrBool>::deserialize(deserializer)? {
        None => default(),
        Some(TextOrBool::Text(s)) => s,
        Some(TextOrBool::Bool(b)) => b.to_string(),
    })
}

fn text_or_default_format<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    lenient_text(deserializer, default_format)
}

fn text_or_default_count_total<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    lenient_text(deserializer, default_count_total)
}
