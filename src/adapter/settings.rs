use super::AdapterMetadata;
use crate::{
    cache::{Cache, CacheKey, Lookup},
    error::{QueryError, Result},
    item::{Item, QueryMethod},
    utils::{format_scope, GLOBAL_SCOPE},
};

use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tracing::{debug, warn};

pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_MAX_PARALLEL: usize = 10;

/// The state every skeleton shares: who the adapter is, where it looks and
/// how long it remembers what it found.
#[derive(Debug)]
pub struct AdapterSettings {
    item_type: String,
    account_id: String,
    region: String,
    support_global_resources: bool,
    cache: Arc<Cache>,
    cache_duration: Option<Duration>,
    timeout: Option<Duration>,
    metadata: Option<AdapterMetadata>,
    dropped_items: AtomicU64,
}

impl AdapterSettings {
    pub fn new<T, A, R>(item_type: T, account_id: A, region: R, cache: Arc<Cache>) -> Self
    where
        T: Into<String>,
        A: Into<String>,
        R: Into<String>,
    {
        Self {
            item_type: item_type.into(),
            account_id: account_id.into(),
            region: region.into(),
            support_global_resources: false,
            cache,
            cache_duration: None,
            timeout: None,
            metadata: None,
            dropped_items: AtomicU64::new(0),
        }
    }

    pub fn set_global(self, support_global_resources: bool) -> Self {
        Self {
            support_global_resources,
            ..self
        }
    }

    pub fn set_cache_duration(self, cache_duration: Option<Duration>) -> Self {
        Self {
            cache_duration,
            ..self
        }
    }

    pub fn set_timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }

    pub fn set_metadata(self, metadata: AdapterMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            ..self
        }
    }

    pub fn item_type(&self) -> &str {
        self.item_type.as_str()
    }

    pub fn name(&self) -> String {
        format!("{}-adapter", self.item_type)
    }

    pub fn metadata(&self) -> Option<&AdapterMetadata> {
        self.metadata.as_ref()
    }

    pub fn scopes(&self) -> Vec<String> {
        let mut scopes = vec![format_scope(&self.account_id, &self.region)];
        if self.support_global_resources {
            scopes.push(GLOBAL_SCOPE.to_string());
        }
        scopes
    }

    /// A zero duration counts as unset.
    pub fn cache_duration(&self) -> Duration {
        self.cache_duration
            .filter(|duration| !duration.is_zero())
            .unwrap_or(DEFAULT_CACHE_DURATION)
    }

    pub fn serves(&self, scope: &str) -> bool {
        self.scopes().iter().any(|s| s == scope)
    }

    pub fn check_scope(&self, scope: &str) -> Result<()> {
        if self.serves(scope) {
            Ok(())
        } else {
            Err(QueryError::no_scope(format!(
                "requested scope {scope} does not match any adapter scope {:?}",
                self.scopes()
            ))
            .with_scope(scope))
        }
    }

    pub fn cache_key(&self, method: QueryMethod, scope: &str, query: Option<&str>) -> CacheKey {
        CacheKey::new(
            self.name(),
            method,
            scope,
            self.item_type.as_str(),
            query.map(String::from),
        )
    }

    pub fn lookup(&self, key: &CacheKey, ignore_cache: bool) -> Lookup {
        let lookup = self.cache.lookup(key, ignore_cache);
        if !matches!(lookup, Lookup::Miss) {
            debug!("{}: cache hit for {key:?}", self.name());
        }
        lookup
    }

    pub fn store_items(&self, items: &[Item], key: &CacheKey) {
        for item in items {
            self.cache
                .store_item(item.clone(), self.cache_duration(), key);
        }
    }

    /// Caches the error if retrying can't change the answer and tags it with
    /// the scope of the query.
    pub fn process_error(&self, err: QueryError, key: &CacheKey) -> QueryError {
        let err = match err.scope() {
            Some(_) => err,
            None => err.with_scope(key.scope()),
        };

        if !err.can_retry() {
            self.cache
                .store_error(err.clone(), self.cache_duration(), key);
        }
        err
    }

    /// Awaits a provider call, bounded by the configured timeout.
    pub async fn invoke<F, T>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                QueryError::timeout(format!(
                    "{}: provider call timed out after {timeout:?}",
                    self.name()
                ))
            })?,
            None => call.await,
        }
    }

    /// Notes an item which could not be produced during a list or search.
    pub fn record_dropped(&self, err: &QueryError) {
        warn!("{}: dropping item: {err}", self.name());
        self.dropped_items.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_items(&self) -> u64 {
        self.dropped_items.load(Ordering::Relaxed)
    }
}

/// What the concrete adapters of one account and region have in common.
#[derive(Debug, Clone)]
pub struct AdapterOptions {
    pub account_id: String,
    pub region: String,
    pub cache: Arc<Cache>,
    pub cache_duration: Option<Duration>,
    pub timeout: Option<Duration>,
    pub max_parallel: usize,
}

impl AdapterOptions {
    pub fn new<A, R>(account_id: A, region: R) -> Self
    where
        A: Into<String>,
        R: Into<String>,
    {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            cache: Arc::new(Cache::new()),
            cache_duration: None,
            timeout: None,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }

    pub fn settings(&self, item_type: &str) -> AdapterSettings {
        AdapterSettings::new(
            item_type,
            self.account_id.as_str(),
            self.region.as_str(),
            Arc::clone(&self.cache),
        )
        .set_cache_duration(self.cache_duration)
        .set_timeout(self.timeout)
    }
}
