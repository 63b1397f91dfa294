use std::sync::RwLock;

/// One level of a topic pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Level {
    /// Literal segment, must match exactly.
    Exact(String),
    /// `+` matches any single segment.
    One,
    /// `#` matches zero or more remaining segments. Only valid as the last level.
    Rest,
}

/// A parsed topic pattern with MQTT-style wildcards.
///
/// - `search/results` matches only itself
/// - `reveal/+/email` matches `reveal/42/email`
/// - `search/#` matches `search`, `search/filters`, `search/page/state`
/// - `#` matches everything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    source: String,
    levels: Vec<Level>,
}

impl Topic {
    /// Parse a pattern. A `#` that is not the last level is treated as a literal.
    pub fn parse(pattern: &str) -> Self {
        let parts: Vec<&str> = split_levels(pattern).collect();
        let last = parts.len().saturating_sub(1);
        let levels = parts
            .iter()
            .enumerate()
            .map(|(i, part)| match *part {
                "+" => Level::One,
                "#" if i == last => Level::Rest,
                other => Level::Exact(other.to_string()),
            })
            .collect();
        Self {
            source: pattern.to_string(),
            levels,
        }
    }

    /// The pattern string this topic was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern contains a wildcard level.
    pub fn is_wildcard(&self) -> bool {
        self.levels.iter().any(|l| !matches!(l, Level::Exact(_)))
    }

    /// Test a concrete path against this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let mut segments = split_levels(path);
        for level in &self.levels {
            match level {
                Level::Rest => return true,
                Level::One => {
                    if segments.next().is_none() {
                        return false;
                    }
                }
                Level::Exact(expected) => match segments.next() {
                    Some(seg) if seg == expected => {}
                    _ => return false,
                },
            }
        }
        segments.next().is_none()
    }
}

fn split_levels(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Thread-safe table of `(pattern, value)` pairs, matched in insertion order.
///
/// Screens register a handful of handlers and subscribers, so a linear scan
/// keeps matching order stable and predictable.
pub struct TopicTable<T> {
    entries: RwLock<Vec<(Topic, T)>>,
}

impl<T: Clone> TopicTable<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, pattern: &str, value: T) {
        let mut entries = self.entries.write().unwrap();
        entries.push((Topic::parse(pattern), value));
    }

    /// All values whose pattern matches `path`, in registration order.
    pub fn matching(&self, path: &str) -> Vec<T> {
        let entries = self.entries.read().unwrap();
        entries
            .iter()
            .filter(|(topic, _)| topic.matches(path))
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Remove values registered under exactly `pattern` for which `predicate` holds.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_where<F>(&self, pattern: &str, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|(topic, value)| !(topic.as_str() == pattern && predicate(value)));
        entries.len() < before
    }

    /// Whether a value is registered under exactly this pattern string.
    pub fn contains_pattern(&self, pattern: &str) -> bool {
        let entries = self.entries.read().unwrap();
        entries.iter().any(|(topic, _)| topic.as_str() == pattern)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for TopicTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
