mod entry;

use crate::{
    error::QueryError,
    item::{Item, QueryMethod},
    utils::lock,
};
use entry::{CacheEntry, CachedValue};

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::debug;

const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    source: String,
    method: QueryMethod,
    scope: String,
    item_type: String,
    query: Option<String>,
}

impl CacheKey {
    pub fn new<S, T, U>(source: S, method: QueryMethod, scope: T, item_type: U, query: Option<String>) -> Self
    where
        S: Into<String>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            source: source.into(),
            method,
            scope: scope.into(),
            item_type: item_type.into(),
            query,
        }
    }

    pub fn method(&self) -> QueryMethod {
        self.method
    }

    pub fn scope(&self) -> &str {
        self.scope.as_str()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    fn same_collection(&self, other: &CacheKey) -> bool {
        self.source == other.source && self.scope == other.scope && self.item_type == other.item_type
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Hit(Vec<Item>),
    Error(QueryError),
    Miss,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<CacheKey, Vec<CacheEntry>>,
    last_purge: Instant,
}

/// A process-local TTL store for query results and for errors which can't be
/// fixed by retrying.
#[derive(Debug)]
pub struct Cache {
    inner: Mutex<Inner>,
    purge_interval: Duration,
}

impl Cache {
    pub fn new() -> Self {
        Self::with_purge_interval(DEFAULT_PURGE_INTERVAL)
    }

    pub fn with_purge_interval(purge_interval: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                last_purge: Instant::now(),
            }),
            purge_interval,
        }
    }

    pub fn lookup(&self, key: &CacheKey, ignore_cache: bool) -> Lookup {
        if ignore_cache {
            return Lookup::Miss;
        }

        let now = Instant::now();
        let inner = lock(&self.inner);

        let live: Vec<&CacheEntry> = inner
            .entries
            .get(key)
            .map(|entries| entries.iter().filter(|e| !e.is_expired(now)).collect())
            .unwrap_or_default();

        if let Some(err) = live.iter().find_map(|e| e.error()) {
            return Lookup::Error(err.clone());
        }

        let items: Vec<Item> = live.iter().filter_map(|e| e.item()).cloned().collect();
        if !items.is_empty() {
            return Lookup::Hit(items);
        }

        // A GET can be answered by an item some other query already stored.
        if let (QueryMethod::Get, Some(query)) = (key.method, key.query.as_deref()) {
            let found = inner
                .entries
                .iter()
                .filter(|(other, _)| key.same_collection(other))
                .flat_map(|(_, entries)| entries.iter())
                .filter(|e| !e.is_expired(now))
                .filter_map(|e| e.item())
                .find(|item| item.unique_attribute_value().as_deref() == Some(query));

            if let Some(item) = found {
                return Lookup::Hit(vec![item.clone()]);
            }
        }

        Lookup::Miss
    }

    /// Stores an item under the key, replacing a previous copy of the same
    /// item and any error cached under the key.
    pub fn store_item(&self, item: Item, ttl: Duration, key: &CacheKey) {
        let mut inner = lock(&self.inner);
        self.purge_if_due(&mut inner);

        let name = item.globally_unique_name();
        let entries = inner.entries.entry(key.clone()).or_default();
        entries.retain(|e| match e.item() {
            Some(cached) => cached.globally_unique_name() != name,
            None => false,
        });
        entries.push(CacheEntry::new(CachedValue::Item(item), ttl));
    }

    /// Stores an error under the key, replacing everything stored there.
    pub fn store_error(&self, err: QueryError, ttl: Duration, key: &CacheKey) {
        let mut inner = lock(&self.inner);
        self.purge_if_due(&mut inner);

        inner
            .entries
            .insert(key.clone(), vec![CacheEntry::new(CachedValue::Error(err), ttl)]);
    }

    /// Removes expired entries and returns how many were removed.
    pub fn purge(&self) -> usize {
        let mut inner = lock(&self.inner);
        purge_entries(&mut inner)
    }

    /// The number of live and expired entries currently held.
    pub fn len(&self) -> usize {
        lock(&self.inner).entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.inner).entries.clear();
    }

    fn purge_if_due(&self, inner: &mut Inner) {
        if inner.last_purge.elapsed() >= self.purge_interval {
            purge_entries(inner);
        }
    }
}

impl Default for Cache {
    fn default() -> Cache {
        Cache::new()
    }
}

fn purge_entries(inner: &mut Inner) -> usize {
    let now = Instant::now();
    let before: usize = inner.entries.values().map(Vec::len).sum();

    for entries in inner.entries.values_mut() {
        entries.retain(|e| !e.is_expired(now));
    }
    inner.entries.retain(|_, entries| !entries.is_empty());
    inner.last_purge = now;

    let removed = before - inner.entries.values().map(Vec::len).sum::<usize>();
    if removed > 0 {
        debug!("purged {removed} expired cache entries");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemAttributes;
    use serde_json::json;

    const SCOPE: &str = "123456789012.eu-west-2";
    const HOUR: Duration = Duration::from_secs(3600);

    fn item(name: &str, size: i64) -> Item {
        let attrs: ItemAttributes = [("name", json!(name)), ("size", json!(size))]
            .into_iter()
            .collect();
        Item::new("test-item", "name", attrs, SCOPE)
    }

    fn key(method: QueryMethod, query: Option<&str>) -> CacheKey {
        CacheKey::new(
            "test-adapter",
            method,
            SCOPE,
            "test-item",
            query.map(String::from),
        )
    }

    #[test]
    fn it_returns_stored_items() {
        let cache = Cache::new();
        let key = key(QueryMethod::List, None);

        assert_eq!(cache.lookup(&key, false), Lookup::Miss);

        cache.store_item(item("a", 1), HOUR, &key);
        cache.store_item(item("b", 1), HOUR, &key);

        match cache.lookup(&key, false) {
            Lookup::Hit(items) => assert_eq!(items.len(), 2),
            other => unreachable!("expected a hit, got {other:?}"),
        }
    }

    #[test]
    fn it_misses_when_ignoring_the_cache() {
        let cache = Cache::new();
        let key = key(QueryMethod::Get, Some("a"));
        cache.store_item(item("a", 1), HOUR, &key);

        assert_eq!(cache.lookup(&key, true), Lookup::Miss);
        assert!(matches!(cache.lookup(&key, false), Lookup::Hit(_)));
    }

    #[test]
    fn it_replaces_the_same_item() {
        let cache = Cache::new();
        let key = key(QueryMethod::Get, Some("a"));

        cache.store_item(item("a", 1), HOUR, &key);
        cache.store_item(item("a", 2), HOUR, &key);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&key, false), Lookup::Hit(vec![item("a", 2)]));
    }

    #[test]
    fn it_answers_gets_from_listed_items() {
        let cache = Cache::new();
        let list = key(QueryMethod::List, None);
        cache.store_item(item("a", 1), HOUR, &list);
        cache.store_item(item("b", 1), HOUR, &list);

        let get = key(QueryMethod::Get, Some("b"));
        assert_eq!(cache.lookup(&get, false), Lookup::Hit(vec![item("b", 1)]));

        let get = key(QueryMethod::Get, Some("c"));
        assert_eq!(cache.lookup(&get, false), Lookup::Miss);

        let other_scope = CacheKey::new(
            "test-adapter",
            QueryMethod::Get,
            "210987654321.us-east-1",
            "test-item",
            Some("b".into()),
        );
        assert_eq!(cache.lookup(&other_scope, false), Lookup::Miss);
    }

    #[test]
    fn it_returns_cached_errors() {
        let cache = Cache::new();
        let key = key(QueryMethod::Get, Some("a"));
        let err = QueryError::not_found("a not found");

        cache.store_error(err.clone(), HOUR, &key);
        assert_eq!(cache.lookup(&key, false), Lookup::Error(err));

        cache.store_item(item("a", 1), HOUR, &key);
        assert_eq!(cache.lookup(&key, false), Lookup::Hit(vec![item("a", 1)]));
    }

    #[test]
    fn it_ignores_and_purges_expired_entries() {
        let cache = Cache::new();
        let list = key(QueryMethod::List, None);
        cache.store_item(item("a", 1), Duration::ZERO, &list);
        cache.store_item(item("b", 1), HOUR, &list);

        assert_eq!(cache.lookup(&list, false), Lookup::Hit(vec![item("b", 1)]));
        assert_eq!(
            cache.lookup(&key(QueryMethod::Get, Some("a")), false),
            Lookup::Miss
        );

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.purge(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn it_keeps_entries_whose_ttl_cannot_be_represented() {
        let cache = Cache::new();
        let key = key(QueryMethod::Get, Some("a"));

        cache.store_item(item("a", 1), Duration::from_secs(u64::MAX), &key);
        assert_eq!(cache.lookup(&key, false), Lookup::Hit(vec![item("a", 1)]));

        assert_eq!(cache.purge(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn it_purges_while_storing_once_the_interval_passes() {
        let cache = Cache::with_purge_interval(Duration::ZERO);
        let list = key(QueryMethod::List, None);

        cache.store_item(item("a", 1), Duration::ZERO, &list);
        cache.store_item(item("b", 1), HOUR, &list);

        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn it_clears_all_entries() {
        let cache = Cache::new();
        cache.store_item(item("a", 1), HOUR, &key(QueryMethod::List, None));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
    }
}
