//! Email verification service: address finder and domain trace.

use std::sync::Arc;

use async_trait::async_trait;
use scout_core::{EndpointConfig, ScoutError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{parse, ApiError, Endpoint, TokenSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailFinderRequest {
    pub first_name: String,
    pub last_name: String,
    pub domain: String,
}

/// Candidate addresses the verifier tried, and the ones that exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailFinderResult {
    pub progress: Vec<String>,
    pub valid_emails: Vec<String>,
    /// Seconds.
    pub elapsed_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainTraceResult {
    pub results: Vec<EmailCheck>,
    pub valid_emails: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailCheck {
    pub email: String,
    pub valid: bool,
    pub reason: Option<String>,
}

#[async_trait]
pub trait VerifierApi: Send + Sync + 'static {
    async fn find_emails(&self, req: &EmailFinderRequest) -> Result<EmailFinderResult, ApiError>;
    async fn verify_domain(&self, domain: &str) -> Result<DomainTraceResult, ApiError>;
}

pub struct VerifierClient {
    endpoint: Endpoint,
}

impl VerifierClient {
    pub fn new(http: reqwest::Client, base_url: &str, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            endpoint: Endpoint::new(http, base_url, token_source),
        }
    }

    pub fn from_config(cfg: &EndpointConfig) -> Result<Self, ScoutError> {
        let base = cfg.require_verifier_url()?;
        let http = crate::http_client(&cfg.user_agent, cfg.timeout())?;
        Ok(Self::new(http, base, crate::token_source(cfg.api_token.as_deref())))
    }

    /// `{base}/api/verify/{domain}` with the domain percent-encoded.
    fn verify_url(&self, domain: &str) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(self.endpoint.base_url())
            .map_err(|e| ApiError::Decode(format!("verifier url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Decode("verifier url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["api", "verify", domain]);
        Ok(url)
    }
}

/// On failure the verifier explains itself in `progress[0]` (finder) or
/// `message` (trace). Anything else stays a plain `Server` error.
async fn parse_explained<R, F>(resp: reqwest::Response, explain: F) -> Result<R, ApiError>
where
    R: serde::de::DeserializeOwned,
    F: Fn(&serde_json::Value) -> Option<String>,
{
    if resp.status().is_success() {
        return parse(resp).await;
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let explained = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .as_ref()
        .and_then(explain)
        .filter(|m| !m.is_empty());
    match explained {
        Some(message) => Err(ApiError::Rejected { status, message }),
        None => Err(ApiError::Server { status, message: body }),
    }
}

#[async_trait]
impl VerifierApi for VerifierClient {
    async fn find_emails(&self, body: &EmailFinderRequest) -> Result<EmailFinderResult, ApiError> {
        debug!(domain = %body.domain, "email finder request");
        let req = self.endpoint.http().post(self.endpoint.url("/api/ghostmail")).json(body);
        let req = self.endpoint.authed(req).await?;
        let resp = req.send().await?;
        parse_explained(resp, |v| v["progress"][0].as_str().map(str::to_string)).await
    }

    async fn verify_domain(&self, domain: &str) -> Result<DomainTraceResult, ApiError> {
        debug!(%domain, "domain trace request");
        let req = self.endpoint.http().get(self.verify_url(domain)?);
        let req = self.endpoint.authed(req).await?;
        let resp = req.send().await?;
        parse_explained(resp, |v| v["message"].as_str().map(str::to_string)).await
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::testutil::{serve, Seen};
    use crate::NoAuth;

    fn client(base: &str) -> VerifierClient {
        VerifierClient::new(reqwest::Client::new(), base, Arc::new(NoAuth))
    }

    fn request() -> EmailFinderRequest {
        EmailFinderRequest {
            first_name: "Jean".into(),
            last_name: "Dupont".into(),
            domain: "example.com".into(),
        }
    }

    #[tokio::test]
    async fn find_emails_posts_camel_case_form() {
        let seen: Seen<Value> = Seen::default();
        let s = seen.clone();
        let app = Router::new().route(
            "/api/ghostmail",
            post(move |Json(body): Json<Value>| {
                let s = s.clone();
                async move {
                    s.set(body);
                    Json(json!({
                        "progress": ["jean.dupont@example.com: ok", "jdupont@example.com: no"],
                        "validEmails": ["jean.dupont@example.com"],
                        "elapsedTime": 1.25
                    }))
                }
            }),
        );
        let base = serve(app).await;

        let result = client(&base).find_emails(&request()).await.unwrap();
        assert_eq!(
            seen.get(),
            json!({"firstName": "Jean", "lastName": "Dupont", "domain": "example.com"})
        );
        assert_eq!(result.valid_emails, vec!["jean.dupont@example.com"]);
        assert_eq!(result.progress.len(), 2);
        assert_eq!(result.elapsed_time, 1.25);
    }

    #[tokio::test]
    async fn find_emails_error_uses_first_progress_line() {
        let app = Router::new().route(
            "/api/ghostmail",
            post(|| async {
                (StatusCode::BAD_REQUEST, Json(json!({"progress": ["Domaine sans serveur MX"]})))
            }),
        );
        let base = serve(app).await;

        let err = client(&base).find_emails(&request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
        assert_eq!(err.to_string(), "Domaine sans serveur MX");
    }

    #[tokio::test]
    async fn find_emails_error_without_explanation_is_server_error() {
        let app = Router::new().route(
            "/api/ghostmail",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = serve(app).await;

        let err = client(&base).find_emails(&request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 502, .. }));
    }

    #[tokio::test]
    async fn verify_domain_decodes_results() {
        let seen: Seen<String> = Seen::default();
        let s = seen.clone();
        let app = Router::new().route(
            "/api/verify/{domain}",
            get(move |Path(domain): Path<String>| {
                let s = s.clone();
                async move {
                    s.set(domain);
                    Json(json!({
                        "results": [
                            {"email": "contact@example.com", "valid": true},
                            {"email": "info@example.com", "valid": false, "reason": "mailbox unavailable"}
                        ],
                        "validEmails": ["contact@example.com"]
                    }))
                }
            }),
        );
        let base = serve(app).await;

        let result = client(&base).verify_domain("example.com").await.unwrap();
        assert_eq!(seen.get(), "example.com");
        assert_eq!(result.results.len(), 2);
        assert!(result.results[0].valid);
        assert_eq!(result.results[1].reason.as_deref(), Some("mailbox unavailable"));
        assert_eq!(result.valid_emails, vec!["contact@example.com"]);
    }

    #[tokio::test]
    async fn verify_domain_error_uses_message() {
        let app = Router::new().route(
            "/api/verify/{domain}",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"message": "Domaine inconnu"}))) }),
        );
        let base = serve(app).await;

        let err = client(&base).verify_domain("nowhere.example").await.unwrap_err();
        assert_eq!(err.to_string(), "Domaine inconnu");
    }

    #[test]
    fn verify_url_encodes_domain_segment() {
        let c = client("http://verifier:8081/");
        assert_eq!(c.verify_url("example.com").unwrap().as_str(), "http://verifier:8081/api/verify/example.com");
        assert_eq!(c.verify_url("a b/c").unwrap().as_str(), "http://verifier:8081/api/verify/a%20b%2Fc");
    }
}
