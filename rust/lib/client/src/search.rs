//! User-search service: paginated people search and protected-field lookup.

use std::sync::Arc;

use async_trait::async_trait;
use scout_core::{EndpointConfig, FilterSet, RevealKind, ScoutError, SearchPage, UserRecord};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::{parse, ApiError, Endpoint, TokenSource};

/// Paging and masking options sent as query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery {
    pub page: u32,
    pub size: u32,
    /// Adds `protectSensitiveData=true`.
    pub protect_sensitive: bool,
}

impl SearchQuery {
    /// Page 0, protected.
    pub fn first(size: u32) -> Self {
        Self { page: 0, size, protect_sensitive: true }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortBy", "_score".to_string()),
            ("direction", "desc".to_string()),
        ];
        if self.protect_sensitive {
            params.push(("protectSensitiveData", "true".to_string()));
        }
        params
    }
}

#[async_trait]
pub trait UserSearchApi: Send + Sync + 'static {
    /// POST the non-empty trimmed filters and decode one page of hits.
    async fn search(&self, filters: &FilterSet, query: &SearchQuery) -> Result<SearchPage, ApiError>;
}

#[async_trait]
pub trait ProtectedDataApi: Send + Sync + 'static {
    /// Fetch the unmasked value of one sensitive field.
    async fn protected_data(&self, user_id: &str, kind: RevealKind) -> Result<String, ApiError>;
}

// ── Wire shapes ─────────────────────────────────────────────────────

/// The backend answers either `{page:{content,totalElements}}` or
/// `{content,totalResults}`, depending on version. The flat shape may also
/// carry a scalar `page` index, which is not the nested page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSearchResponse {
    #[serde(deserialize_with = "nested_page")]
    page: Option<RawPage>,
    content: Option<Vec<UserRecord>>,
    total_results: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPage {
    content: Option<Vec<UserRecord>>,
    total_elements: Option<u64>,
}

fn nested_page<'de, D>(de: D) -> Result<Option<RawPage>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(de)? {
        Some(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

impl RawSearchResponse {
    fn into_page(self) -> SearchPage {
        let (page_content, page_total) = match self.page {
            Some(p) => (p.content, p.total_elements),
            None => (None, None),
        };
        let records = page_content.or(self.content).unwrap_or_default();
        // A zero total in the nested shape falls through to totalResults.
        let total = page_total
            .filter(|t| *t > 0)
            .or(self.total_results)
            .unwrap_or(0);
        SearchPage { records, total }
    }
}

#[derive(Debug, Deserialize)]
struct ProtectedValue {
    value: Option<String>,
}

/// Decode a search response body in either shape.
pub fn decode_search_response(body: serde_json::Value) -> Result<SearchPage, ApiError> {
    let raw: RawSearchResponse = serde_json::from_value(body)
        .map_err(|e| ApiError::Decode(format!("search response: {}", e)))?;
    Ok(raw.into_page())
}

// ── SearchClient ────────────────────────────────────────────────────

pub struct SearchClient {
    endpoint: Endpoint,
    search_path: String,
    protected_path: String,
}

impl SearchClient {
    pub fn new(http: reqwest::Client, base_url: &str, token_source: Arc<dyn TokenSource>) -> Self {
        let defaults = EndpointConfig::default();
        Self {
            endpoint: Endpoint::new(http, base_url, token_source),
            search_path: defaults.search_path,
            protected_path: defaults.protected_path,
        }
    }

    /// Client for `endpoints.search_url`; errors when it is not configured.
    pub fn from_config(cfg: &EndpointConfig) -> Result<Self, ScoutError> {
        let base = cfg.require_search_url()?;
        let http = crate::http_client(&cfg.user_agent, cfg.timeout())?;
        Ok(Self::new(http, base, crate::token_source(cfg.api_token.as_deref()))
            .with_paths(&cfg.search_path, &cfg.protected_path))
    }

    pub fn with_paths(mut self, search_path: &str, protected_path: &str) -> Self {
        self.search_path = search_path.to_string();
        self.protected_path = protected_path.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    /// `{base}{protected_path}/{user_id}` with the id percent-encoded.
    fn protected_url(&self, user_id: &str) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.endpoint.url(&self.protected_path))
            .map_err(|e| ApiError::Decode(format!("protected data url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Decode("protected data url cannot carry a path".into()))?
            .pop_if_empty()
            .push(user_id);
        Ok(url)
    }
}

#[async_trait]
impl UserSearchApi for SearchClient {
    async fn search(&self, filters: &FilterSet, query: &SearchQuery) -> Result<SearchPage, ApiError> {
        let body = filters.to_body();
        debug!(fields = body.len(), page = query.page, size = query.size, "search request");
        let req = self
            .endpoint
            .http()
            .post(self.endpoint.url(&self.search_path))
            .query(&query.params())
            .json(&body);
        let req = self.endpoint.authed(req).await?;
        let resp = req.send().await?;
        let value: serde_json::Value = parse(resp).await?;
        decode_search_response(value)
    }
}

#[async_trait]
impl ProtectedDataApi for SearchClient {
    async fn protected_data(&self, user_id: &str, kind: RevealKind) -> Result<String, ApiError> {
        let url = self.protected_url(user_id)?;
        let req = self
            .endpoint
            .http()
            .get(url)
            .query(&[("type", kind.as_str())]);
        let req = self.endpoint.authed(req).await?;
        let resp = req.send().await?;
        let pv: ProtectedValue = parse(resp).await?;
        Ok(pv.value.unwrap_or_default())
    }
}
