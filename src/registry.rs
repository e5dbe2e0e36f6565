use crate::{
    adapter::{Adapter, AdapterMetadata},
    error::{QueryError, Result},
    item::{Item, Query, QueryMethod},
};

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Routes queries to the adapter serving their type and scope.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn Adapter>>,
}

/// How an adapter is listed by `GET /adapters`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdapterInfo {
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AdapterMetadata>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter once it has passed validation.
    pub fn add(&mut self, adapter: Arc<dyn Adapter>) -> Result<()> {
        adapter.validate()?;
        info!(
            "registered {} for scopes {:?}",
            adapter.name(),
            adapter.scopes()
        );
        self.adapters.push(adapter);
        Ok(())
    }

    pub fn adapters(&self) -> &[Arc<dyn Adapter>] {
        &self.adapters
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn describe(&self) -> Vec<AdapterInfo> {
        self.adapters
            .iter()
            .map(|adapter| AdapterInfo {
                item_type: adapter.item_type().to_string(),
                name: adapter.name(),
                scopes: adapter.scopes(),
                metadata: adapter.metadata().cloned(),
            })
            .collect()
    }

    /// The heaviest adapter of `item_type` that serves `scope`.
    pub fn find(&self, item_type: &str, scope: &str) -> Result<Arc<dyn Adapter>> {
        let mut of_type = self
            .adapters
            .iter()
            .filter(|adapter| adapter.item_type() == item_type)
            .peekable();

        if of_type.peek().is_none() {
            return Err(QueryError::not_found(format!(
                "no adapter for type {item_type}"
            )));
        }

        of_type
            .filter(|adapter| adapter.scopes().iter().any(|s| s == scope))
            .max_by_key(|adapter| adapter.weight())
            .map(Arc::clone)
            .ok_or_else(|| {
                QueryError::no_scope(format!("no {item_type} adapter serves scope {scope}"))
                    .with_scope(scope)
            })
    }

    pub async fn query(&self, query: &Query, ignore_cache: bool) -> Result<Vec<Item>> {
        let adapter = self.find(&query.item_type, &query.scope)?;

        match query.method {
            QueryMethod::Get => adapter
                .get(&query.scope, &query.query, ignore_cache)
                .await
                .map(|item| vec![item]),
            QueryMethod::List => adapter.list(&query.scope, ignore_cache).await,
            QueryMethod::Search => adapter.search(&query.scope, &query.query, ignore_cache).await,
        }
    }
}
