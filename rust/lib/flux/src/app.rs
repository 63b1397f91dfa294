use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use crate::router::{Payload, Router};
use crate::store::StateStore;
use crate::value::{StateValue, SubscriptionId};

/// The state engine a screen is built on.
///
/// Three primitives:
/// - `get(path)` reads state
/// - `emit(path, payload)` sends a request to the registered handler(s)
/// - `subscribe(pattern, f)` observes state changes
///
/// ```ignore
/// let flux = Flux::new();
/// flux.on("search/submit", |_, _, store| async move {
///     store.set("search/results", SearchResults::default());
/// });
/// flux.subscribe("search/#", |path, _| println!("{path} changed"));
/// flux.emit("search/submit", SubmitReq).await;
/// ```
pub struct Flux {
    store: Arc<StateStore>,
    router: Router,
}

impl Flux {
    pub fn new() -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            router: Router::new(),
        }
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        self.store.get(path)
    }

    /// Typed read: clones the state at `path` out as `T`.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.store.get_as(path)
    }

    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        self.store.scan(prefix)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.store.contains(path)
    }

    /// Emit a request and wait for every matching handler to finish.
    ///
    /// Returns the number of handlers that ran.
    pub async fn emit<T: Any + Send + Sync>(&self, path: &str, payload: T) -> usize {
        self.emit_arc(path, Arc::new(payload)).await
    }

    pub async fn emit_arc(&self, path: &str, payload: Payload) -> usize {
        self.router
            .dispatch(path, payload, Arc::clone(&self.store))
            .await
    }

    /// Register an async handler. `pattern` accepts `+` and `#` wildcards.
    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.router.on(pattern, handler);
    }

    pub fn has_handler(&self, path: &str) -> bool {
        self.router.matches(path)
    }

    /// Observe state changes. The callback runs on the writer's thread.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        self.store.subscribe(pattern, handler)
    }

    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        self.store.unsubscribe(pattern, id)
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}

impl Default for Flux {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter(u32);

    #[tokio::test]
    async fn emit_runs_handler_that_writes_state() {
        let flux = Flux::new();
        flux.on("counter/increment", |_, _, store: Arc<StateStore>| async move {
            store.update("counter/value", || Counter(0), |c| c.0 += 1);
        });

        assert_eq!(flux.emit("counter/increment", ()).await, 1);
        assert_eq!(flux.emit("counter/increment", ()).await, 1);
        assert_eq!(flux.get_as::<Counter>("counter/value"), Some(Counter(2)));
        assert!(flux.contains("counter/value"));
    }

    #[tokio::test]
    async fn emit_without_handler_returns_zero() {
        let flux = Flux::new();
        assert_eq!(flux.emit("nobody/home", ()).await, 0);
        assert!(!flux.has_handler("nobody/home"));
    }

    #[tokio::test]
    async fn subscribers_observe_handler_writes() {
        let flux = Flux::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let id = flux.subscribe("counter/#", move |path, value| {
            let c = value.downcast_ref::<Counter>().unwrap().0;
            s.lock().unwrap().push(format!("{path}={c}"));
        });
        flux.on("counter/increment", |_, _, store: Arc<StateStore>| async move {
            store.update("counter/value", || Counter(0), |c| c.0 += 1);
        });

        flux.emit("counter/increment", ()).await;
        assert!(flux.unsubscribe("counter/#", id));
        flux.emit("counter/increment", ()).await;

        assert_eq!(*seen.lock().unwrap(), vec!["counter/value=1".to_string()]);
    }

    #[test]
    fn scan_reads_through_to_store() {
        let flux = Flux::default();
        flux.store().set("reveal/1/email", 1u32);
        flux.store().set("reveal/1/phone", 2u32);
        assert_eq!(flux.scan("reveal/1").len(), 2);
        assert!(flux.get("reveal").is_none());
    }
}
