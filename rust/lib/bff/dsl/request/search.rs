//! Search screen requests.

use scout_core::FilterField;

/// One form input changed. Schedules a debounced search.
// #[request("search/set-field")]
#[derive(Debug, Clone)]
pub struct SetFieldReq {
    pub field: FilterField,
    pub value: String,
}

impl SetFieldReq {
    pub const PATH: &'static str = "search/set-field";

    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }
}

/// Search now from page 0, dropping any pending debounce.
// #[request("search/submit")]
#[derive(Debug, Clone)]
pub struct SubmitSearchReq;

impl SubmitSearchReq {
    pub const PATH: &'static str = "search/submit";
}

// #[request("search/next-page")]
#[derive(Debug, Clone)]
pub struct NextPageReq;

impl NextPageReq {
    pub const PATH: &'static str = "search/next-page";
}

// #[request("search/previous-page")]
#[derive(Debug, Clone)]
pub struct PreviousPageReq;

impl PreviousPageReq {
    pub const PATH: &'static str = "search/previous-page";
}

/// Jump straight to a zero-based page of the current results. Past the
/// end lands on the last page.
// #[request("search/go-to-page")]
#[derive(Debug, Clone)]
pub struct GoToPageReq {
    pub index: u32,
}

impl GoToPageReq {
    pub const PATH: &'static str = "search/go-to-page";
}

/// Empty the form and the results.
// #[request("search/clear")]
#[derive(Debug, Clone)]
pub struct ClearSearchReq;

impl ClearSearchReq {
    pub const PATH: &'static str = "search/clear";
}
