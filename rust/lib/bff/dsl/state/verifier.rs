//! Email finder and domain trace screens.

use scout_client::{DomainTraceResult, EmailFinderResult};
use serde::Serialize;

// #[state("email-finder/state")]
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailFinderState {
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<EmailFinderResult>,
}

impl EmailFinderState {
    pub const PATH: &'static str = "email-finder/state";
}

// #[state("domain-trace/state")]
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainTraceState {
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DomainTraceResult>,
}

impl DomainTraceState {
    pub const PATH: &'static str = "domain-trace/state";
}
