//! Scout HTTP clients.
//!
//! One client per remote collaborator, each behind a trait so the BFF can
//! be driven by in-memory fakes in tests:
//!
//! - [`UserSearchApi`] / [`ProtectedDataApi`]: the user-search service
//! - [`ReverseGeocoder`]: Nominatim-compatible reverse geocoding
//! - [`VerifierApi`]: email finder and domain verification
//!
//! Authentication is pluggable through [`TokenSource`].
//!
//! # Usage
//!
//! ```ignore
//! use scout_client::{SearchClient, SearchQuery, UserSearchApi};
//!
//! let client = SearchClient::from_config(&config.endpoints)?;
//! let page = client.search(&filters, &SearchQuery::first(20)).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

pub mod geocode;
pub mod search;
pub mod verifier;

#[cfg(test)]
mod testutil;

pub use geocode::{NominatimClient, Place, ReverseGeocoder};
pub use search::{ProtectedDataApi, SearchClient, SearchQuery, UserSearchApi};
pub use verifier::{DomainTraceResult, EmailCheck, EmailFinderRequest, EmailFinderResult, VerifierApi, VerifierClient};

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// Non-2xx answer that carried a human-readable explanation.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } | ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

impl From<ApiError> for scout_core::ScoutError {
    fn from(e: ApiError) -> Self {
        scout_core::ScoutError::Upstream(e.to_string())
    }
}

// ── TokenSource ─────────────────────────────────────────────────────

/// Pluggable token provider, called before every request.
/// `Ok(None)` sends no Authorization header.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// Anonymous requests.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// Bearer token taken from configuration.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(Some(self.0.clone()))
    }
}

/// `StaticToken` when a token is configured, `NoAuth` otherwise.
pub fn token_source(token: Option<&str>) -> Arc<dyn TokenSource> {
    match token.filter(|t| !t.is_empty()) {
        Some(t) => Arc::new(StaticToken::new(t)),
        None => Arc::new(NoAuth),
    }
}

// ── Shared HTTP plumbing ────────────────────────────────────────────

/// reqwest client with the configured User-Agent and timeout.
pub fn http_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}

/// Base URL + auth shared by every client in this crate.
#[derive(Clone)]
pub(crate) struct Endpoint {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl Endpoint {
    pub(crate) fn new(http: reqwest::Client, base_url: &str, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_source,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Attach the bearer token, if any.
    pub(crate) async fn authed(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, ApiError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }
}

/// Decode a 2xx body, or turn the status + body into `ApiError::Server`.
pub(crate) async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let code = status.as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server { status: code, message: body });
    }
    resp.json::<R>()
        .await
        .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
}
