//! Bounded, expiring cache of revealed values.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use scout_core::RevealKind;
use tokio::time::Instant;

type Key = (String, RevealKind);

struct Entry {
    value: String,
    stored_at: Instant,
}

/// Keyed by `(user id, kind)`. Holds at most `capacity` entries, evicting
/// the oldest insert first; entries older than `ttl` are treated as absent.
pub struct RevealCache {
    entries: HashMap<Key, Entry>,
    order: VecDeque<Key>,
    capacity: usize,
    ttl: Duration,
}

impl RevealCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            ttl,
        }
    }

    pub fn get(&mut self, user_id: &str, kind: RevealKind) -> Option<String> {
        let key = (user_id.to_string(), kind);
        let expired = match self.entries.get(&key) {
            Some(entry) => entry.stored_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            self.remove(&key);
            return None;
        }
        self.entries.get(&key).map(|e| e.value.clone())
    }

    pub fn insert(&mut self, user_id: &str, kind: RevealKind, value: String) {
        if self.capacity == 0 {
            return;
        }
        let key = (user_id.to_string(), kind);
        self.remove(&key);
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else { break };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, Entry { value, stored_at: Instant::now() });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn remove(&mut self, key: &Key) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}
