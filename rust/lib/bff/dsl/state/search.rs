//! Search screen state: `search/form`, `search/results`, `search/view`.

use scout_core::{FilterSet, PageState, UserRecord};
use serde::Serialize;

/// Current form values.
// #[state("search/form")]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    pub filters: FilterSet,
    /// A debounced search is armed and has not fired yet.
    pub pending: bool,
}

impl SearchForm {
    pub const PATH: &'static str = "search/form";

    pub fn new(filters: FilterSet) -> Self {
        Self { filters, pending: false }
    }
}

/// Last accepted page of hits.
///
/// On a failed search `records` keeps the previous page and `error` is set.
// #[state("search/results")]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub records: Vec<UserRecord>,
    pub page: PageState,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResults {
    pub const PATH: &'static str = "search/results";

    pub fn empty(page_size: u32) -> Self {
        Self {
            records: vec![],
            page: PageState::new(page_size),
            loading: false,
            error: None,
        }
    }
}

/// Render-ready results table.
// #[state("search/view")]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView {
    pub rows: Vec<ResultRow>,
    pub total: u64,
    /// "Page 1 of 3", localized.
    pub page_label: String,
    pub can_next: bool,
    pub can_previous: bool,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultsView {
    pub const PATH: &'static str = "search/view";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub user_id: String,
    pub name: String,
    pub gender: String,
    pub city: String,
    pub country: String,
    pub workplace: String,
    pub job_title: String,
    /// Placeholder unless unmasked by the backend or revealed.
    pub email: String,
    pub phone: String,
    pub relationship: String,
}
