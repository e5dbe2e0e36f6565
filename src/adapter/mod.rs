mod always_get;
mod describe_only;
mod get_list;
mod paginator;
mod settings;
mod tags;

pub use always_get::{AlwaysGetAdapter, AlwaysGetAdapterBuilder};
pub use describe_only::{DescribeOnlyAdapter, DescribeOnlyAdapterBuilder};
pub use get_list::{GetListAdapter, GetListAdapterBuilder};
pub use paginator::{Paginator, TokenPaginator};
pub use settings::{AdapterOptions, AdapterSettings, DEFAULT_CACHE_DURATION, DEFAULT_MAX_PARALLEL};
pub use tags::handle_tags_error;

use crate::{
    arn::Arn,
    cache::Lookup,
    error::{QueryError, Result},
    item::{Item, QueryMethod},
    utils::format_scope,
};

use axum::async_trait;
use serde::Serialize;

/// The weight every adapter reports unless it overrides it. When two adapters
/// serve the same type and scope the heavier one wins.
pub const DEFAULT_WEIGHT: i32 = 100;

/// The uniform contract every adapter exposes, whichever skeleton it is
/// built on.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn item_type(&self) -> &str;

    fn name(&self) -> String;

    fn scopes(&self) -> Vec<String>;

    fn metadata(&self) -> Option<&AdapterMetadata>;

    fn weight(&self) -> i32 {
        DEFAULT_WEIGHT
    }

    /// Fails with a `Config` error if a required function is missing.
    fn validate(&self) -> Result<()>;

    async fn get(&self, scope: &str, query: &str, ignore_cache: bool) -> Result<Item>;

    async fn list(&self, scope: &str, ignore_cache: bool) -> Result<Vec<Item>>;

    async fn search(&self, scope: &str, query: &str, ignore_cache: bool) -> Result<Vec<Item>>;
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdapterMetadata {
    pub descriptive_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub supported_queries: Vec<SupportedQuery>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub potential_links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SupportedQuery {
    pub method: QueryMethod,
    pub description: String,
}

impl SupportedQuery {
    pub fn new<T: Into<String>>(method: QueryMethod, description: T) -> Self {
        Self {
            method,
            description: description.into(),
        }
    }
}

/// Runs a GET for the resource the ARN points at, after checking the ARN
/// belongs to a scope this adapter serves.
pub(crate) async fn search_arn<A>(
    adapter: &A,
    settings: &AdapterSettings,
    scope: &str,
    query: &str,
    ignore_cache: bool,
) -> Result<Vec<Item>>
where
    A: Adapter + ?Sized,
{
    let key = settings.cache_key(QueryMethod::Search, scope, Some(query));
    if let Lookup::Error(err) = settings.lookup(&key, ignore_cache) {
        return Err(err);
    }

    let arn = Arn::parse(query).map_err(QueryError::from)?;
    let arn_scope = format_scope(arn.account_id(), arn.region());

    if !settings.serves(&arn_scope) {
        let err = QueryError::no_scope(format!(
            "ARN scope {arn_scope} does not match adapter scopes {:?}",
            settings.scopes()
        ));
        return Err(settings.process_error(err, &key));
    }

    let item = adapter.get(scope, arn.resource_id(), ignore_cache).await?;
    Ok(vec![item])
}

/// Picks the single item whose unique value matches the query.
pub(crate) fn exactly_one(
    settings: &AdapterSettings,
    items: Vec<Item>,
    query: &str,
) -> Result<Item> {
    let mut items = items.into_iter();

    match (items.next(), items.next()) {
        (Some(item), None) => Ok(item),
        (None, _) => Err(QueryError::not_found(format!(
            "{} {query} not found",
            settings.item_type()
        ))),
        (Some(_), Some(_)) => Err(QueryError::other(format!(
            "{} {query}: expected 1 item, got {}",
            settings.item_type(),
            items.len() + 2
        ))),
    }
}
