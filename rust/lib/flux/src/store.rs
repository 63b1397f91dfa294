use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::topic::TopicTable;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Path-addressed state with pattern-matched change notifications.
///
/// Every write bumps a store-wide revision. Subscribers run synchronously on
/// the writing thread, after the write lock has been released, so a
/// subscriber may read the store.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    subscribers: TopicTable<Subscriber>,
    next_id: AtomicU64,
    revision: AtomicU64,
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    handler: ChangeHandler,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            subscribers: TopicTable::new(),
            next_id: AtomicU64::new(1),
            revision: AtomicU64::new(0),
        }
    }

    /// Store a typed value at `path` and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    pub fn set_value(&self, path: &str, value: StateValue) {
        {
            let mut values = self.values.write().unwrap();
            values.insert(path.to_string(), value.clone());
            self.revision.fetch_add(1, Ordering::AcqRel);
        }
        self.notify(path, &value);
    }

    /// Read-modify-write a typed value.
    ///
    /// `f` receives the current value (or `init()` when the path is empty or
    /// holds another type). The read and write happen under one write lock.
    /// Returns the value that was stored.
    pub fn update<T, I, F>(&self, path: &str, init: I, f: F) -> T
    where
        T: Any + Clone + Send + Sync,
        I: FnOnce() -> T,
        F: FnOnce(&mut T),
    {
        let (stored, value) = {
            let mut values = self.values.write().unwrap();
            let mut current = values
                .get(path)
                .and_then(|v| v.cloned::<T>())
                .unwrap_or_else(init);
            f(&mut current);
            let value = StateValue::new(current.clone());
            values.insert(path.to_string(), value.clone());
            self.revision.fetch_add(1, Ordering::AcqRel);
            (current, value)
        };
        self.notify(path, &value);
        stored
    }

    pub fn get(&self, path: &str) -> Option<StateValue> {
        let values = self.values.read().unwrap();
        values.get(path).cloned()
    }

    /// Read and clone a typed value. `None` when absent or of another type.
    pub fn get_as<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.cloned::<T>())
    }

    /// Remove the value at `path`. Subscribers are not notified.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let mut values = self.values.write().unwrap();
        let old = values.remove(path);
        if old.is_some() {
            self.revision.fetch_add(1, Ordering::AcqRel);
        }
        old
    }

    /// Children of `prefix` (not `prefix` itself), ordered by path.
    pub fn scan(&self, prefix: &str) -> Vec<(String, StateValue)> {
        let values = self.values.read().unwrap();
        let start = format!("{}/", prefix.trim_end_matches('/'));
        values
            .range(start.clone()..)
            .take_while(|(k, _)| k.starts_with(&start))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.values.read().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.values.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store-wide write counter. Renderers poll it to detect any change.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn paths(&self) -> Vec<String> {
        self.values.read().unwrap().keys().cloned().collect()
    }

    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.insert(
            pattern,
            Subscriber {
                id,
                handler: Arc::new(handler),
            },
        );
        id
    }

    /// Returns `true` if a subscription was removed.
    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) -> bool {
        self.subscribers.remove_where(pattern, |s| s.id == id)
    }

    fn notify(&self, path: &str, value: &StateValue) {
        for sub in self.subscribers.matching(path) {
            (sub.handler)(path, value);
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Filters {
        first_name: String,
    }

    #[test]
    fn set_then_get_as() {
        let store = StateStore::new();
        store.set("search/filters", Filters { first_name: "Jean".into() });

        let f: Filters = store.get_as("search/filters").unwrap();
        assert_eq!(f.first_name, "Jean");
        assert!(store.get_as::<String>("search/filters").is_none());
        assert!(store.get_as::<Filters>("missing").is_none());
    }

    #[test]
    fn set_overwrites() {
        let store = StateStore::new();
        store.set("counter", 1u32);
        store.set("counter", 2u32);
        assert_eq!(store.get_as::<u32>("counter"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_starts_from_init_and_mutates() {
        let store = StateStore::new();
        let out = store.update("search/filters", Filters::default, |f| {
            f.first_name = "Ana".into();
        });
        assert_eq!(out.first_name, "Ana");

        let out = store.update("search/filters", Filters::default, |f| {
            f.first_name.push('s');
        });
        assert_eq!(out.first_name, "Anas");
        assert_eq!(store.get_as::<Filters>("search/filters"), Some(out));
    }

    #[test]
    fn update_replaces_value_of_other_type() {
        let store = StateStore::new();
        store.set("x", "text".to_string());
        let out = store.update("x", || 10u32, |v| *v += 1);
        assert_eq!(out, 11);
    }

    #[test]
    fn remove_does_not_notify() {
        let store = StateStore::new();
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        store.subscribe("a", move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("a", 1u32);
        assert!(store.remove("a").is_some());
        assert!(store.remove("a").is_none());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn scan_lists_children_in_order() {
        let store = StateStore::new();
        store.set("reveal/b", 2u32);
        store.set("reveal/a", 1u32);
        store.set("reveal", 0u32);
        store.set("revealed/x", 9u32);

        let paths: Vec<String> = store.scan("reveal").into_iter().map(|(k, _)| k).collect();
        assert_eq!(paths, vec!["reveal/a".to_string(), "reveal/b".to_string()]);
    }

    #[test]
    fn revision_advances_on_every_write() {
        let store = StateStore::new();
        assert_eq!(store.revision(), 0);
        store.set("a", 1u32);
        store.update("a", || 0u32, |v| *v += 1);
        assert_eq!(store.revision(), 2);
        store.remove("missing");
        assert_eq!(store.revision(), 2);
        store.remove("a");
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn wildcard_subscriber_sees_matching_paths() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let s = seen.clone();
        store.subscribe("search/#", move |path, _| {
            s.lock().unwrap().push(path.to_string());
        });

        store.set("search/filters", 1u32);
        store.set("search/page", 2u32);
        store.set("location/selected", 3u32);

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["search/filters".to_string(), "search/page".to_string()]
        );
    }

    #[test]
    fn subscriber_can_read_store_during_notification() {
        let store = Arc::new(StateStore::new());
        let observed = Arc::new(Mutex::new(None::<u32>));
        let (s, o) = (Arc::clone(&store), observed.clone());
        store.subscribe("counter", move |path, _| {
            *o.lock().unwrap() = s.get_as::<u32>(path);
        });

        store.set("counter", 7u32);
        assert_eq!(*observed.lock().unwrap(), Some(7));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = StateStore::new();
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        let id = store.subscribe("a", move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("a", 1u32);
        assert!(store.unsubscribe("a", id));
        assert!(!store.unsubscribe("a", id));
        store.set("a", 2u32);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }
}
