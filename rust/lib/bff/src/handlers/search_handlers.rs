//! Search controller: form state, debounce, invocation, paging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use scout_client::{SearchQuery, UserSearchApi};
use scout_core::{FilterField, FilterSet, RevealKind, SearchConfig, SelectedLocation, UserRecord};
use scout_flux::{I18nStore, StateStore};
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use crate::i18n_strings::{page_label_url, ERROR_SEARCH};
use crate::request::*;
use crate::state::*;

/// Which fields a search screen exposes and how it behaves.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchScreen {
    pub fields: Vec<FilterField>,
    /// Ask the backend to mask sensitive fields; the table then shows
    /// reveal cells for them.
    pub protect_sensitive: bool,
    pub page_size: u32,
    pub text_debounce: Duration,
    pub select_debounce: Duration,
    /// Non-empty text shorter than this does not schedule a search.
    pub min_chars: usize,
}

impl SearchScreen {
    pub fn from_config(cfg: &SearchConfig) -> Self {
        Self {
            fields: FilterField::ALL.to_vec(),
            protect_sensitive: cfg.protect_sensitive,
            page_size: cfg.page_size.max(1),
            text_debounce: cfg.text_debounce(),
            select_debounce: cfg.select_debounce(),
            min_chars: cfg.min_chars,
        }
    }

    pub fn with_fields(mut self, fields: &[FilterField]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    /// Delay before searching after `field` changed to `value`, or `None`
    /// when the edit should not trigger a search.
    pub fn debounce_for(&self, field: FilterField, value: &str) -> Option<Duration> {
        if field.is_select() {
            return Some(self.select_debounce);
        }
        let len = value.chars().count();
        (len == 0 || len >= self.min_chars).then_some(self.text_debounce)
    }
}

impl Default for SearchScreen {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

pub struct SearchController {
    api: Arc<dyn UserSearchApi>,
    i18n: Arc<I18nStore>,
    screen: SearchScreen,
    debounce: Debouncer,
    /// Sequence number of the most recently dispatched search.
    latest: AtomicU64,
}

impl SearchController {
    pub fn new(api: Arc<dyn UserSearchApi>, i18n: Arc<I18nStore>, screen: SearchScreen) -> Self {
        Self {
            api,
            i18n,
            screen,
            debounce: Debouncer::new(),
            latest: AtomicU64::new(0),
        }
    }

    pub fn screen(&self) -> &SearchScreen {
        &self.screen
    }

    fn empty_form(&self) -> SearchForm {
        SearchForm::new(FilterSet::with_fields(&self.screen.fields))
    }

    fn empty_results(&self) -> SearchResults {
        SearchResults::empty(self.screen.page_size)
    }

    /// Handle `app/initialize`.
    pub fn seed(&self, store: &StateStore) {
        store.set(SearchForm::PATH, self.empty_form());
        store.set(SearchResults::PATH, self.empty_results());
        self.publish_view(store);
    }

    /// Handle `search/set-field`.
    pub fn handle_set_field(self: &Arc<Self>, req: &SetFieldReq, store: &Arc<StateStore>) {
        self.debounce.cancel();
        let delay = self.screen.debounce_for(req.field, &req.value);
        store.update(
            SearchForm::PATH,
            || self.empty_form(),
            |form| {
                form.filters.set(req.field, req.value.clone());
                form.pending = delay.is_some();
            },
        );

        match delay {
            Some(delay) => {
                debug!(field = %req.field, ?delay, "search scheduled");
                let this = Arc::clone(self);
                let store = Arc::clone(store);
                self.debounce.schedule(delay, async move {
                    this.search_from_start(&store).await;
                });
            }
            None => debug!(field = %req.field, "value too short, search not scheduled"),
        }
    }

    /// Handle `search/submit`.
    pub async fn handle_submit(&self, store: &StateStore) {
        self.debounce.cancel();
        self.search_from_start(store).await;
    }

    /// Handle `search/next-page`.
    pub async fn handle_next(&self, store: &StateStore) {
        let mut moved = false;
        store.update(SearchResults::PATH, || self.empty_results(), |r| moved = r.page.next());
        if moved {
            self.run(store).await;
        } else {
            debug!("already on the last page");
        }
    }

    /// Handle `search/previous-page`.
    pub async fn handle_previous(&self, store: &StateStore) {
        let mut moved = false;
        store.update(SearchResults::PATH, || self.empty_results(), |r| moved = r.page.previous());
        if moved {
            self.run(store).await;
        } else {
            debug!("already on the first page");
        }
    }

    /// Handle `search/go-to-page`.
    pub async fn handle_go_to(&self, req: &GoToPageReq, store: &StateStore) {
        let mut moved = false;
        store.update(SearchResults::PATH, || self.empty_results(), |r| moved = r.page.go_to(req.index));
        if moved {
            self.run(store).await;
        } else {
            debug!(index = req.index, "already on that page");
        }
    }

    /// Handle `search/clear`.
    pub fn handle_clear(&self, store: &StateStore) {
        self.debounce.cancel();
        // Orphan whatever is still in flight.
        self.latest.fetch_add(1, Ordering::AcqRel);
        store.update(SearchForm::PATH, || self.empty_form(), |form| {
            form.filters.clear();
            form.pending = false;
        });
        store.set(SearchResults::PATH, self.empty_results());
        self.publish_view(store);
    }

    /// Write a picked location into the form and search immediately.
    pub async fn apply_location(&self, store: &StateStore, location: &SelectedLocation) {
        self.debounce.cancel();
        store.update(SearchForm::PATH, || self.empty_form(), |form| location.apply_to(&mut form.filters));
        self.search_from_start(store).await;
    }

    async fn search_from_start(&self, store: &StateStore) {
        store.update(SearchForm::PATH, || self.empty_form(), |form| form.pending = false);
        store.update(SearchResults::PATH, || self.empty_results(), |r| r.page.reset());
        self.run(store).await;
    }

    /// Fetch the current page with the current filters.
    async fn run(&self, store: &StateStore) {
        let filters = store
            .get_as::<SearchForm>(SearchForm::PATH)
            .map(|f| f.filters)
            .unwrap_or_else(|| FilterSet::with_fields(&self.screen.fields));
        let seq = self.latest.fetch_add(1, Ordering::AcqRel) + 1;

        if !filters.has_criteria() {
            debug!("no criteria, clearing results");
            store.update(SearchResults::PATH, || self.empty_results(), |r| {
                r.records.clear();
                r.page.reset();
                r.page.total = 0;
                r.loading = false;
                r.error = None;
            });
            self.publish_view(store);
            return;
        }

        let page = store
            .update(SearchResults::PATH, || self.empty_results(), |r| {
                r.loading = true;
                r.error = None;
            })
            .page;
        self.publish_view(store);

        let query = SearchQuery {
            page: page.index,
            size: page.size,
            protect_sensitive: self.screen.protect_sensitive,
        };
        let outcome = self.api.search(&filters, &query).await;

        if self.latest.load(Ordering::Acquire) != seq {
            debug!(seq, "discarding stale search response");
            return;
        }

        match outcome {
            Ok(result) => {
                info!(total = result.total, page = query.page, rows = result.records.len(), "search completed");
                store.update(SearchResults::PATH, || self.empty_results(), |r| {
                    r.records = result.records;
                    r.page.total = result.total;
                    r.loading = false;
                });
            }
            Err(e) => {
                warn!(error = %e, "search failed");
                let message = self.i18n.get(ERROR_SEARCH);
                store.update(SearchResults::PATH, || self.empty_results(), |r| {
                    r.loading = false;
                    r.error = Some(message);
                });
            }
        }
        self.publish_view(store);
    }

    /// Rebuild `search/view` from the results and any revealed cells.
    pub fn publish_view(&self, store: &StateStore) {
        let results = store
            .get_as::<SearchResults>(SearchResults::PATH)
            .unwrap_or_else(|| self.empty_results());
        store.set(ResultsView::PATH, build_view(&results, &self.screen, &self.i18n, store));
    }
}

/// Table rows, page label and navigation flags for `results`.
pub fn build_view(results: &SearchResults, screen: &SearchScreen, i18n: &I18nStore, store: &StateStore) -> ResultsView {
    let page = &results.page;
    ResultsView {
        rows: results.records.iter().map(|r| build_row(r, screen, store)).collect(),
        total: page.total,
        page_label: i18n.get(&page_label_url(page.current_page(), page.total_pages())),
        can_next: page.can_next(),
        can_previous: page.can_previous(),
        loading: results.loading,
        error: results.error.clone(),
    }
}

fn build_row(record: &UserRecord, screen: &SearchScreen, store: &StateStore) -> ResultRow {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let user_id = text(&record.user_id);
    let protected = |kind: RevealKind, plain: &Option<String>| {
        if !screen.protect_sensitive {
            return text(plain);
        }
        store
            .get_as::<RevealField>(&RevealField::path(&user_id, kind))
            .unwrap_or_default()
            .display(kind)
            .to_string()
    };

    ResultRow {
        name: record.display_name(),
        gender: text(&record.gender),
        city: text(&record.current_city),
        country: text(&record.current_country),
        workplace: text(&record.workplace),
        job_title: text(&record.job_title),
        email: protected(RevealKind::Email, &record.email),
        phone: protected(RevealKind::Phone, &record.phone_number),
        relationship: protected(RevealKind::Relationship, &record.relationship_status),
        user_id,
    }
}
