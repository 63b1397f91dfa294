use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::trace;

use crate::store::StateStore;
use crate::topic::TopicTable;

/// A boxed, `Send`-able future returned by request handlers.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type-erased request payload.
pub type Payload = Arc<dyn Any + Send + Sync>;

type ErasedHandler = Arc<dyn Fn(String, Payload, Arc<StateStore>) -> BoxFuture + Send + Sync>;

/// Maps request paths to async handlers.
///
/// Every handler whose pattern matches the emitted path runs, one after the
/// other, in registration order. Emitting a path nobody handles is a no-op.
pub struct Router {
    handlers: TopicTable<ErasedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            handlers: TopicTable::new(),
        }
    }

    pub fn on<F, Fut>(&self, pattern: &str, handler: F)
    where
        F: Fn(String, Payload, Arc<StateStore>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let erased: ErasedHandler =
            Arc::new(move |path, payload, store| -> BoxFuture { Box::pin(handler(path, payload, store)) });
        self.handlers.insert(pattern, erased);
    }

    /// Run every matching handler. Returns how many ran.
    pub async fn dispatch(&self, path: &str, payload: Payload, store: Arc<StateStore>) -> usize {
        let handlers = self.handlers.matching(path);
        trace!(path, handlers = handlers.len(), "dispatch");
        for handler in &handlers {
            handler(path.to_string(), Arc::clone(&payload), Arc::clone(&store)).await;
        }
        handlers.len()
    }

    /// Whether a handler was registered under exactly this pattern.
    pub fn has_handler(&self, pattern: &str) -> bool {
        self.handlers.contains_pattern(pattern)
    }

    /// Whether emitting `path` would reach any handler.
    pub fn matches(&self, path: &str) -> bool {
        !self.handlers.matching(path).is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug)]
    struct SetField {
        name: String,
        value: String,
    }

    #[tokio::test]
    async fn dispatch_exact_handler_with_typed_payload() {
        let router = Router::new();
        router.on("search/set-field", |_, payload, store: Arc<StateStore>| async move {
            let req = payload.downcast_ref::<SetField>().unwrap();
            store.set(&format!("search/filters/{}", req.name), req.value.clone());
        });

        let store = Arc::new(StateStore::new());
        let ran = router
            .dispatch(
                "search/set-field",
                Arc::new(SetField { name: "firstName".into(), value: "Jean".into() }),
                Arc::clone(&store),
            )
            .await;

        assert_eq!(ran, 1);
        assert_eq!(store.get_as::<String>("search/filters/firstName").as_deref(), Some("Jean"));
    }

    #[tokio::test]
    async fn unmatched_path_is_noop() {
        let router = Router::new();
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        router.on("search/submit", move |_, _, _| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::Relaxed);
            }
        });

        let ran = router.dispatch("search/clear", Arc::new(()), Arc::new(StateStore::new())).await;
        assert_eq!(ran, 0);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        assert!(!router.matches("search/clear"));
        assert!(router.matches("search/submit"));
    }

    #[tokio::test]
    async fn handlers_run_sequentially_in_registration_order() {
        let router = Router::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for (pattern, tag) in [("search/#", "module"), ("search/submit", "exact"), ("#", "audit")] {
            let order = order.clone();
            router.on(pattern, move |_, _, _| {
                let order = order.clone();
                async move {
                    order.lock().unwrap().push(tag);
                }
            });
        }

        router.dispatch("search/submit", Arc::new(()), Arc::new(StateStore::new())).await;
        assert_eq!(*order.lock().unwrap(), vec!["module", "exact", "audit"]);
        assert!(router.has_handler("search/#"));
        assert!(!router.has_handler("search/+"));
    }

    #[tokio::test]
    async fn handler_receives_matched_path() {
        let router = Router::new();
        let seen = Arc::new(Mutex::new(String::new()));
        let s = seen.clone();
        router.on("reveal/+", move |path, _, _| {
            let s = s.clone();
            async move {
                *s.lock().unwrap() = path;
            }
        });

        router.dispatch("reveal/toggle", Arc::new(()), Arc::new(StateStore::new())).await;
        assert_eq!(*seen.lock().unwrap(), "reveal/toggle");
    }
}
