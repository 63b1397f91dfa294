//! Path-addressed message translation.
//!
//! Screens store message *keys* in state (`error/search`) and renderers
//! resolve them with `i18n.get("page/label?current=1&total=3")`.
//! Handlers are registered per pattern; the first match wins.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::topic::TopicTable;

/// Parsed `key=value&key2=value2` arguments of a message URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        Self(
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Translates one message path for one locale.
pub trait I18nHandler: Send + Sync + 'static {
    fn translate(&self, path: &str, query: &QueryParams, locale: &str) -> String;
}

impl<F> I18nHandler for F
where
    F: Fn(&str, &QueryParams, &str) -> String + Send + Sync + 'static,
{
    fn translate(&self, path: &str, query: &QueryParams, locale: &str) -> String {
        (self)(path, query, locale)
    }
}

/// Static message table: locale → path → template.
///
/// Templates substitute `{name}` with the query parameter `name`.
/// Unknown locales fall back to `fallback`; unknown paths return the path.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    fallback: String,
    messages: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new(fallback: &str) -> Self {
        Self {
            fallback: fallback.to_string(),
            messages: HashMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, locale: &str, path: &str, template: &str) -> Self {
        self.insert(locale, path, template);
        self
    }

    pub fn insert(&mut self, locale: &str, path: &str, template: &str) {
        self.messages
            .entry(locale.to_string())
            .or_default()
            .insert(path.to_string(), template.to_string());
    }

    fn lookup(&self, path: &str, locale: &str) -> Option<&str> {
        self.messages
            .get(locale)
            .and_then(|m| m.get(path))
            .or_else(|| self.messages.get(&self.fallback).and_then(|m| m.get(path)))
            .map(String::as_str)
    }
}

impl I18nHandler for Catalog {
    fn translate(&self, path: &str, query: &QueryParams, locale: &str) -> String {
        match self.lookup(path, locale) {
            Some(template) => fill(template, query),
            None => path.to_string(),
        }
    }
}

fn fill(template: &str, query: &QueryParams) -> String {
    query.iter().fold(template.to_string(), |acc, (k, v)| {
        acc.replace(&format!("{{{k}}}"), v)
    })
}

/// Synchronous translation store with pattern-routed handlers.
pub struct I18nStore {
    handlers: TopicTable<Arc<dyn I18nHandler>>,
    locale: RwLock<String>,
}

impl I18nStore {
    pub fn new(locale: &str) -> Self {
        Self {
            handlers: TopicTable::new(),
            locale: RwLock::new(locale.to_string()),
        }
    }

    pub fn handle(&self, pattern: &str, handler: Arc<dyn I18nHandler>) {
        self.handlers.insert(pattern, handler);
    }

    /// Resolve `"path"` or `"path?k=v&k2=v2"`. Unhandled paths come back as-is.
    pub fn get(&self, url: &str) -> String {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let params = QueryParams::parse(query);
        let locale = self.locale();
        match self.handlers.matching(path).first() {
            Some(handler) => handler.translate(path, &params, &locale),
            None => path.to_string(),
        }
    }

    pub fn set_locale(&self, locale: &str) {
        *self.locale.write().unwrap() = locale.to_string();
    }

    pub fn locale(&self) -> String {
        self.locale.read().unwrap().clone()
    }
}
