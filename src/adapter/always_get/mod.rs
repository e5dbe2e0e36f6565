mod builder;

pub use builder::AlwaysGetAdapterBuilder;

use super::{
    search_arn, Adapter, AdapterMetadata, AdapterSettings, Paginator, DEFAULT_MAX_PARALLEL,
};
use crate::{
    cache::Lookup,
    error::{QueryError, Result},
    item::{Item, QueryMethod},
};

use axum::async_trait;
use futures::{
    future::{BoxFuture, FutureExt},
    stream::{self, StreamExt},
};
use std::future::Future;

type ListFunc<C, LI, LO> = Box<dyn Fn(C, LI) -> BoxFuture<'static, Result<LO>> + Send + Sync>;
type PaginatorBuilder<C, LI, LO> = Box<dyn Fn(C, LI) -> Box<dyn Paginator<LO>> + Send + Sync>;
type ListOutputMapper<LI, LO, GI> = Box<dyn Fn(&LO, &LI) -> Result<Vec<GI>> + Send + Sync>;
type GetInputMapper<GI> = Box<dyn Fn(&str, &str) -> GI + Send + Sync>;
type GetFunc<C, GI> = Box<dyn Fn(C, String, GI) -> BoxFuture<'static, Result<Item>> + Send + Sync>;
type SearchInputMapper<LI> = Box<dyn Fn(&str, &str) -> Result<LI> + Send + Sync>;
type SearchGetInputMapper<GI> = Box<dyn Fn(&str, &str) -> Result<GI> + Send + Sync>;

/// An adapter for APIs whose list calls return too little to build an item
/// from, so every listed resource is fetched again with a get.
pub struct AlwaysGetAdapter<C, LI, LO, GI> {
    settings: AdapterSettings,
    client: C,
    list_input: Option<LI>,
    list_func: Option<ListFunc<C, LI, LO>>,
    list_paginator_builder: Option<PaginatorBuilder<C, LI, LO>>,
    list_output_mapper: Option<ListOutputMapper<LI, LO, GI>>,
    get_input_mapper: Option<GetInputMapper<GI>>,
    get_func: Option<GetFunc<C, GI>>,
    search_input_mapper: Option<SearchInputMapper<LI>>,
    search_get_input_mapper: Option<SearchGetInputMapper<GI>>,
    always_search_arns: bool,
    disable_list: bool,
    max_parallel: usize,
}

impl<C, LI, LO, GI> AlwaysGetAdapter<C, LI, LO, GI>
where
    C: Clone + Send + Sync + 'static,
    LI: Clone + Send + Sync + 'static,
    LO: Send + 'static,
    GI: Send + 'static,
{
    pub fn builder(settings: AdapterSettings, client: C) -> AlwaysGetAdapterBuilder<C, LI, LO, GI> {
        AlwaysGetAdapterBuilder::new(settings, client)
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn missing(&self, what: &str) -> QueryError {
        QueryError::config(format!("{}: {what} is not set", self.settings.name()))
    }

    async fn get_one(&self, scope: &str, input: GI) -> Result<Item> {
        let get = self
            .get_func
            .as_ref()
            .ok_or_else(|| self.missing("get func"))?;

        self.settings
            .invoke(get(self.client.clone(), scope.to_string(), input))
            .await
    }

    /// Lists with the given input, then gets every resource the list found.
    async fn list_with(&self, scope: &str, input: LI) -> Result<Vec<Item>> {
        let mapper = self
            .list_output_mapper
            .as_ref()
            .ok_or_else(|| self.missing("list output mapper"))?;

        let mut inputs = vec![];

        match (self.list_paginator_builder.as_ref(), self.list_func.as_ref()) {
            (Some(builder), _) => {
                let mut paginator = builder(self.client.clone(), input.clone());
                while paginator.has_more_pages() {
                    let output = self.settings.invoke(paginator.next_page()).await?;
                    inputs.extend(mapper(&output, &input)?);
                }
            }
            (None, Some(list)) => {
                let output = self
                    .settings
                    .invoke(list(self.client.clone(), input.clone()))
                    .await?;
                inputs.extend(mapper(&output, &input)?);
            }
            (None, None) => return Err(self.missing("list func")),
        }

        Ok(self.get_all(scope, inputs).await)
    }

    /// Runs the gets with at most `max_parallel` in flight, dropping the
    /// ones that fail.
    async fn get_all(&self, scope: &str, inputs: Vec<GI>) -> Vec<Item> {
        let calls: Vec<BoxFuture<'_, Result<Item>>> = inputs
            .into_iter()
            .map(|input| self.get_one(scope, input).boxed())
            .collect();

        let results: Vec<Result<Item>> = stream::iter(calls)
            .buffered(self.max_parallel)
            .collect()
            .await;

        results
            .into_iter()
            .filter_map(|result| match result {
                Ok(item) => Some(item),
                Err(err) => {
                    self.settings.record_dropped(&err);
                    None
                }
            })
            .collect()
    }

    async fn search_items(&self, scope: &str, query: &str) -> Result<Vec<Item>> {
        if let Some(mapper) = self.search_input_mapper.as_ref() {
            let input = mapper(scope, query)?;
            return self.list_with(scope, input).await;
        }

        let mapper = self
            .search_get_input_mapper
            .as_ref()
            .ok_or_else(|| self.missing("search input mapper"))?;
        let input = mapper(scope, query)?;
        let item = self.get_one(scope, input).await?;

        Ok(vec![item])
    }

    fn searches_arns(&self) -> bool {
        self.always_search_arns
            || (self.search_input_mapper.is_none() && self.search_get_input_mapper.is_none())
    }
}

#[async_trait]
impl<C, LI, LO, GI> Adapter for AlwaysGetAdapter<C, LI, LO, GI>
where
    C: Clone + Send + Sync + 'static,
    LI: Clone + Send + Sync + 'static,
    LO: Send + 'static,
    GI: Send + 'static,
{
    fn item_type(&self) -> &str {
        self.settings.item_type()
    }

    fn name(&self) -> String {
        self.settings.name()
    }

    fn scopes(&self) -> Vec<String> {
        self.settings.scopes()
    }

    fn metadata(&self) -> Option<&AdapterMetadata> {
        self.settings.metadata()
    }

    fn validate(&self) -> Result<()> {
        if self.get_func.is_none() {
            return Err(self.missing("get func"));
        }
        if self.get_input_mapper.is_none() {
            return Err(self.missing("get input mapper"));
        }
        if self.disable_list {
            return Ok(());
        }
        if self.list_input.is_none() {
            return Err(self.missing("list input"));
        }
        if self.list_func.is_none() && self.list_paginator_builder.is_none() {
            return Err(self.missing("list func"));
        }
        if self.list_output_mapper.is_none() {
            return Err(self.missing("list output mapper"));
        }
        Ok(())
    }

    async fn get(&self, scope: &str, query: &str, ignore_cache: bool) -> Result<Item> {
        self.settings.check_scope(scope)?;
        self.validate()?;

        let key = self.settings.cache_key(QueryMethod::Get, scope, Some(query));
        match self.settings.lookup(&key, ignore_cache) {
            Lookup::Hit(items) => {
                if let Some(item) = items.into_iter().next() {
                    return Ok(item);
                }
            }
            Lookup::Error(err) => return Err(err),
            Lookup::Miss => {}
        }

        let input = match self.get_input_mapper.as_ref() {
            Some(mapper) => mapper(scope, query),
            None => return Err(self.missing("get input mapper")),
        };

        match self.get_one(scope, input).await {
            Ok(item) => {
                self.settings.store_items(std::slice::from_ref(&item), &key);
                Ok(item)
            }
            Err(err) => Err(self.settings.process_error(err, &key)),
        }
    }

    async fn list(&self, scope: &str, ignore_cache: bool) -> Result<Vec<Item>> {
        self.settings.check_scope(scope)?;
        if self.disable_list {
            return Ok(vec![]);
        }
        self.validate()?;

        let key = self.settings.cache_key(QueryMethod::List, scope, None);
        match self.settings.lookup(&key, ignore_cache) {
            Lookup::Hit(items) => return Ok(items),
            Lookup::Error(err) => return Err(err),
            Lookup::Miss => {}
        }

        let input = match self.list_input.as_ref() {
            Some(input) => input.clone(),
            None => return Err(self.missing("list input")),
        };

        match self.list_with(scope, input).await {
            Ok(items) => {
                self.settings.store_items(&items, &key);
                Ok(items)
            }
            Err(err) => Err(self.settings.process_error(err, &key)),
        }
    }

    async fn search(&self, scope: &str, query: &str, ignore_cache: bool) -> Result<Vec<Item>> {
        self.settings.check_scope(scope)?;
        self.validate()?;

        if self.searches_arns() {
            return search_arn(self, &self.settings, scope, query, ignore_cache).await;
        }

        let key = self
            .settings
            .cache_key(QueryMethod::Search, scope, Some(query));
        match self.settings.lookup(&key, ignore_cache) {
            Lookup::Hit(items) => return Ok(items),
            Lookup::Error(err) => return Err(err),
            Lookup::Miss => {}
        }

        match self.search_items(scope, query).await {
            Ok(items) => {
                self.settings.store_items(&items, &key);
                Ok(items)
            }
            Err(err) => Err(self.settings.process_error(err, &key)),
        }
    }
}
