//! Protected field revealer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scout_client::ProtectedDataApi;
use scout_core::RevealConfig;
use scout_flux::StateStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::reveal_cache::RevealCache;
use crate::request::ToggleRevealReq;
use crate::state::{RevealField, RevealPhase};

/// Drives every `reveal/{userId}/{kind}` cell: fetch on demand, cache,
/// auto-hide after `timeout`.
pub struct RevealService {
    api: Arc<dyn ProtectedDataApi>,
    cache: Mutex<RevealCache>,
    /// Auto-hide timers by state path.
    timers: Mutex<HashMap<String, CancellationToken>>,
    /// Bumped by `reset`; fetches started before a reset are discarded.
    generation: AtomicU64,
    timeout: Duration,
}

impl RevealService {
    pub fn new(api: Arc<dyn ProtectedDataApi>, cfg: &RevealConfig) -> Self {
        Self {
            api,
            cache: Mutex::new(RevealCache::new(cfg.cache_capacity, cfg.cache_ttl())),
            timers: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
            timeout: cfg.timeout(),
        }
    }

    /// Handle `reveal/toggle`.
    pub async fn handle_toggle(self: &Arc<Self>, req: &ToggleRevealReq, store: &Arc<StateStore>) {
        let path = RevealField::path(&req.user_id, req.kind);
        let current = store.get_as::<RevealField>(&path).unwrap_or_default();

        match current.phase {
            RevealPhase::Revealed => {
                self.cancel_timer(&path);
                store.set(&path, RevealField::hidden());
            }
            RevealPhase::Loading => debug!(%path, "reveal already in flight"),
            RevealPhase::Hidden => {
                let cached = self.cache.lock().unwrap().get(&req.user_id, req.kind);
                let value = match cached {
                    Some(value) => {
                        debug!(%path, "reveal cache hit");
                        value
                    }
                    None => {
                        let generation = self.generation.load(Ordering::SeqCst);
                        store.set(&path, RevealField::loading());
                        let fetched = self.api.protected_data(&req.user_id, req.kind).await;
                        if self.generation.load(Ordering::SeqCst) != generation {
                            debug!(%path, "reveal finished after reset, dropped");
                            return;
                        }
                        match fetched {
                            Ok(value) => {
                                self.cache.lock().unwrap().insert(&req.user_id, req.kind, value.clone());
                                value
                            }
                            Err(e) => {
                                warn!(%path, error = %e, "failed to fetch protected data");
                                store.set(&path, RevealField::hidden());
                                return;
                            }
                        }
                    }
                };
                store.set(&path, RevealField::revealed(value));
                self.arm_timer(path, store);
            }
        }
    }

    fn arm_timer(self: &Arc<Self>, path: String, store: &Arc<StateStore>) {
        let token = CancellationToken::new();
        if let Some(old) = self.timers.lock().unwrap().insert(path.clone(), token.clone()) {
            old.cancel();
        }

        let this = Arc::clone(self);
        let store = Arc::clone(store);
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    this.timers.lock().unwrap().remove(&path);
                    debug!(%path, "auto-hiding revealed value");
                    store.set(&path, RevealField::hidden());
                }
            }
        });
    }

    fn cancel_timer(&self, path: &str) {
        if let Some(token) = self.timers.lock().unwrap().remove(path) {
            token.cancel();
        }
    }

    /// Hide every revealed cell and forget cached values.
    pub fn reset(&self, store: &StateStore) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        for (_, token) in self.timers.lock().unwrap().drain() {
            token.cancel();
        }
        self.cache.lock().unwrap().clear();
        for (path, _) in store.scan("reveal/") {
            store.set(&path, RevealField::hidden());
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}
