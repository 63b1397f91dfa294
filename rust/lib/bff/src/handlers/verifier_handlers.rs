//! Email finder and domain trace screens.

use std::sync::Arc;

use scout_client::{ApiError, EmailFinderRequest, VerifierApi};
use scout_core::{is_present, is_valid_domain};
use scout_flux::{I18nStore, StateStore};
use tracing::{info, warn};

use crate::i18n_strings::*;
use crate::request::*;
use crate::state::*;

pub struct VerifierScreens {
    api: Arc<dyn VerifierApi>,
    i18n: Arc<I18nStore>,
}

impl VerifierScreens {
    pub fn new(api: Arc<dyn VerifierApi>, i18n: Arc<I18nStore>) -> Self {
        Self { api, i18n }
    }

    /// Handle `app/initialize`.
    pub fn seed(&self, store: &StateStore) {
        store.set(EmailFinderState::PATH, EmailFinderState::default());
        store.set(DomainTraceState::PATH, DomainTraceState::default());
    }

    /// The service's own explanation when it gave one, else `fallback`.
    fn message(&self, err: &ApiError, fallback: &str) -> String {
        match err {
            ApiError::Rejected { message, .. } => message.clone(),
            _ => self.i18n.get(fallback),
        }
    }

    /// Handle `email-finder/submit`.
    pub async fn handle_find_emails(&self, req: &FindEmailsReq, store: &StateStore) {
        if ![&req.first_name, &req.last_name, &req.domain].iter().all(|v| is_present(v)) {
            let message = self.i18n.get(ERROR_REQUIRED_FIELDS);
            store.update(EmailFinderState::PATH, EmailFinderState::default, |s| s.error = Some(message));
            return;
        }

        store.update(EmailFinderState::PATH, EmailFinderState::default, |s| {
            s.busy = true;
            s.error = None;
        });
        let body = EmailFinderRequest {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            domain: req.domain.trim().to_string(),
        };
        match self.api.find_emails(&body).await {
            Ok(result) => {
                info!(domain = %body.domain, found = result.valid_emails.len(), "email finder completed");
                store.set(EmailFinderState::PATH, EmailFinderState {
                    busy: false,
                    error: None,
                    result: Some(result),
                });
            }
            Err(e) => {
                warn!(domain = %body.domain, error = %e, "email finder failed");
                let message = self.message(&e, ERROR_EMAIL_FINDER);
                store.update(EmailFinderState::PATH, EmailFinderState::default, |s| {
                    s.busy = false;
                    s.error = Some(message);
                });
            }
        }
    }

    /// Handle `domain-trace/submit`.
    pub async fn handle_trace(&self, req: &TraceDomainReq, store: &StateStore) {
        let domain = req.domain.trim();
        let invalid = if domain.is_empty() {
            Some(ERROR_DOMAIN_REQUIRED)
        } else if !is_valid_domain(domain) {
            Some(ERROR_DOMAIN_INVALID)
        } else {
            None
        };
        if let Some(key) = invalid {
            let message = self.i18n.get(key);
            store.update(DomainTraceState::PATH, DomainTraceState::default, |s| s.error = Some(message));
            return;
        }

        store.update(DomainTraceState::PATH, DomainTraceState::default, |s| {
            s.busy = true;
            s.error = None;
        });
        match self.api.verify_domain(domain).await {
            Ok(result) => {
                info!(%domain, checked = result.results.len(), valid = result.valid_emails.len(), "domain trace completed");
                store.set(DomainTraceState::PATH, DomainTraceState {
                    busy: false,
                    error: None,
                    result: Some(result),
                });
            }
            Err(e) => {
                warn!(%domain, error = %e, "domain trace failed");
                let message = self.message(&e, ERROR_DOMAIN_TRACE);
                store.update(DomainTraceState::PATH, DomainTraceState::default, |s| {
                    s.busy = false;
                    s.error = Some(message);
                });
            }
        }
    }
}
