//! In-memory fakes for handler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scout_client::{
    ApiError, DomainTraceResult, EmailCheck, EmailFinderRequest, EmailFinderResult, Place, ProtectedDataApi,
    ReverseGeocoder, SearchQuery, UserSearchApi, VerifierApi,
};
use scout_core::{FilterSet, LatLon, RevealKind, SearchPage, UserRecord};
use scout_flux::I18nStore;

pub fn i18n_en() -> Arc<I18nStore> {
    let i18n = I18nStore::new("en");
    crate::i18n_strings::register_all(&i18n);
    Arc::new(i18n)
}

pub fn records(n: usize) -> Vec<UserRecord> {
    (0..n)
        .map(|i| UserRecord {
            user_id: Some(format!("u{i}")),
            first_name: Some("Jean".into()),
            last_name: Some(format!("Dupont{i}")),
            current_city: Some("Lyon".into()),
            ..Default::default()
        })
        .collect()
}

fn server_error(status: u16) -> ApiError {
    ApiError::Server { status, message: "fake failure".into() }
}

// ── Search ──

#[derive(Clone)]
pub enum Reply {
    Page(SearchPage),
    Fail(u16),
}

/// Replies are consumed in order; the last one repeats.
pub struct FakeSearch {
    replies: Mutex<VecDeque<(Duration, Reply)>>,
    seen: Mutex<Vec<(serde_json::Map<String, serde_json::Value>, SearchQuery)>>,
}

impl FakeSearch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, reply: Reply) {
        self.push_delayed(Duration::ZERO, reply);
    }

    pub fn push_delayed(&self, delay: Duration, reply: Reply) {
        self.replies.lock().unwrap().push_back((delay, reply));
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Body and query of the most recent call.
    pub fn last(&self) -> Option<(serde_json::Map<String, serde_json::Value>, SearchQuery)> {
        self.seen.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl UserSearchApi for FakeSearch {
    async fn search(&self, filters: &FilterSet, query: &SearchQuery) -> Result<SearchPage, ApiError> {
        self.seen.lock().unwrap().push((filters.to_body(), *query));
        let next = {
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 { replies.pop_front() } else { replies.front().cloned() }
        };
        let (delay, reply) = next.unwrap_or((Duration::ZERO, Reply::Page(SearchPage::empty())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Page(page) => Ok(page),
            Reply::Fail(status) => Err(server_error(status)),
        }
    }
}

// ── Protected data ──

pub struct FakeProtected {
    calls: AtomicUsize,
    fail: bool,
    delay: Duration,
}

impl FakeProtected {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), fail: false, delay: Duration::ZERO })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), fail: true, delay: Duration::ZERO })
    }

    /// Answers after `delay`.
    pub fn delayed(delay: Duration) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), fail: false, delay })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProtectedDataApi for FakeProtected {
    async fn protected_data(&self, user_id: &str, kind: RevealKind) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(server_error(503));
        }
        Ok(format!("{}-of-{}", kind.as_str(), user_id))
    }
}

// ── Geocoder ──

pub struct FakeGeocoder {
    place: Option<Place>,
    calls: AtomicUsize,
}

impl FakeGeocoder {
    /// Answers "Unknown" / "Unknown".
    pub fn new() -> Arc<Self> {
        Self::returning("Unknown", "Unknown")
    }

    pub fn returning(city: &str, country: &str) -> Arc<Self> {
        Arc::new(Self {
            place: Some(Place { city: city.into(), country: country.into() }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { place: None, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(&self, _at: LatLon) -> Result<Place, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.place.clone().ok_or_else(|| server_error(429))
    }
}

// ── Verifier ──

enum VerifierMode {
    Ok,
    Rejected(String),
    Failing,
}

pub struct FakeVerifier {
    mode: VerifierMode,
    calls: AtomicUsize,
    last_finder: Mutex<Option<EmailFinderRequest>>,
}

impl FakeVerifier {
    fn with_mode(mode: VerifierMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: AtomicUsize::new(0),
            last_finder: Mutex::new(None),
        })
    }

    pub fn new() -> Arc<Self> {
        Self::with_mode(VerifierMode::Ok)
    }

    pub fn rejecting(message: &str) -> Arc<Self> {
        Self::with_mode(VerifierMode::Rejected(message.to_string()))
    }

    pub fn failing() -> Arc<Self> {
        Self::with_mode(VerifierMode::Failing)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_finder(&self) -> Option<EmailFinderRequest> {
        self.last_finder.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            VerifierMode::Ok => Ok(()),
            VerifierMode::Rejected(message) => Err(ApiError::Rejected { status: 400, message: message.clone() }),
            VerifierMode::Failing => Err(server_error(502)),
        }
    }
}

#[async_trait]
impl VerifierApi for FakeVerifier {
    async fn find_emails(&self, req: &EmailFinderRequest) -> Result<EmailFinderResult, ApiError> {
        *self.last_finder.lock().unwrap() = Some(req.clone());
        self.outcome()?;
        Ok(EmailFinderResult {
            progress: vec![format!("{}.{}@{}: ok", req.first_name, req.last_name, req.domain).to_lowercase()],
            valid_emails: vec![format!("{}.{}@{}", req.first_name, req.last_name, req.domain).to_lowercase()],
            elapsed_time: 0.5,
        })
    }

    async fn verify_domain(&self, domain: &str) -> Result<DomainTraceResult, ApiError> {
        self.outcome()?;
        Ok(DomainTraceResult {
            results: vec![EmailCheck { email: format!("contact@{domain}"), valid: true, reason: None }],
            valid_emails: vec![format!("contact@{domain}")],
        })
    }
}
