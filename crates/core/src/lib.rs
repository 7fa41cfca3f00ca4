// Request translation for the ClinicalTrials.gov registry: typed tool
// parameters, URL construction and the single pass-through GET.

pub mod client;
pub mod config;
pub mod error;
pub mod params;

pub use client::{CtGovClient, UpstreamFailure, UpstreamResult};
pub use config::{Settings, UpstreamConfig};
pub use error::{CtGovError, CtGovResult};
pub use params::{GetStudyParams, ListStudiesParams, SearchOptions, SpecificFieldsParams, StudySearch};
