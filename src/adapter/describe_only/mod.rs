mod builder;

pub use builder::DescribeOnlyAdapterBuilder;

use super::{exactly_one, search_arn, Adapter, AdapterMetadata, AdapterSettings, Paginator};
use crate::{
    cache::Lookup,
    error::{QueryError, Result},
    item::{Item, QueryMethod},
};

use axum::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;

type GetInputMapper<I> = Box<dyn Fn(&str, &str) -> Result<I> + Send + Sync>;
type ListInputMapper<I> = Box<dyn Fn(&str) -> Result<I> + Send + Sync>;
type SearchInputMapper<C, I> =
    Box<dyn Fn(C, String, String) -> BoxFuture<'static, Result<I>> + Send + Sync>;
type PaginatorBuilder<C, I, O> = Box<dyn Fn(C, I) -> Box<dyn Paginator<O>> + Send + Sync>;
type DescribeFunc<C, I, O> = Box<dyn Fn(C, I) -> BoxFuture<'static, Result<O>> + Send + Sync>;
type OutputMapper<C, I, O> =
    Box<dyn Fn(C, String, I, O) -> BoxFuture<'static, Result<Vec<Item>>> + Send + Sync>;

/// An adapter for APIs that only have a describe call, which answers both
/// GET and LIST depending on its input.
pub struct DescribeOnlyAdapter<C, I, O> {
    settings: AdapterSettings,
    client: C,
    input_mapper_get: Option<GetInputMapper<I>>,
    input_mapper_list: Option<ListInputMapper<I>>,
    input_mapper_search: Option<SearchInputMapper<C, I>>,
    paginator_builder: Option<PaginatorBuilder<C, I, O>>,
    describe_func: Option<DescribeFunc<C, I, O>>,
    output_mapper: Option<OutputMapper<C, I, O>>,
    use_list_for_get: bool,
}

impl<C, I, O> DescribeOnlyAdapter<C, I, O>
where
    C: Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    pub fn builder(settings: AdapterSettings, client: C) -> DescribeOnlyAdapterBuilder<C, I, O> {
        DescribeOnlyAdapterBuilder::new(settings, client)
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    pub fn paginated(&self) -> bool {
        self.paginator_builder.is_some()
    }

    fn missing(&self, what: &str) -> QueryError {
        QueryError::config(format!("{}: {what} is not set", self.settings.name()))
    }

    async fn get_items(&self, scope: &str, query: &str) -> Result<Item> {
        let mapper = self
            .input_mapper_get
            .as_ref()
            .ok_or_else(|| self.missing("input mapper for GET"))?;
        let input = mapper(scope, query)?;

        let items = if self.use_list_for_get {
            self.describe_all(scope, input)
                .await?
                .into_iter()
                .filter(|item| item.unique_attribute_value().as_deref() == Some(query))
                .collect()
        } else {
            self.describe_once(scope, input).await?
        };

        exactly_one(&self.settings, items, query)
    }

    async fn list_items(&self, scope: &str) -> Result<Vec<Item>> {
        let mapper = self
            .input_mapper_list
            .as_ref()
            .ok_or_else(|| self.missing("input mapper for LIST"))?;
        let input = mapper(scope)?;

        self.describe_all(scope, input).await
    }

    async fn search_items(&self, scope: &str, query: &str) -> Result<Vec<Item>> {
        let mapper = self
            .input_mapper_search
            .as_ref()
            .ok_or_else(|| self.missing("input mapper for SEARCH"))?;
        let input = self
            .settings
            .invoke(mapper(self.client.clone(), scope.to_string(), query.to_string()))
            .await?;

        self.describe_all(scope, input).await
    }

    /// Calls the describe function once and maps its output.
    async fn describe_once(&self, scope: &str, input: I) -> Result<Vec<Item>> {
        let describe = self
            .describe_func
            .as_ref()
            .ok_or_else(|| self.missing("describe func"))?;

        let output = self
            .settings
            .invoke(describe(self.client.clone(), input.clone()))
            .await?;
        self.map_output(scope, input, output).await
    }

    /// Walks every page if there is a paginator, otherwise describes once.
    /// A page that fails to map fails the whole call.
    async fn describe_all(&self, scope: &str, input: I) -> Result<Vec<Item>> {
        let builder = match self.paginator_builder.as_ref() {
            Some(builder) => builder,
            None => return self.describe_once(scope, input).await,
        };

        let mut paginator = builder(self.client.clone(), input.clone());
        let mut items = vec![];

        while paginator.has_more_pages() {
            let output = self.settings.invoke(paginator.next_page()).await?;
            items.extend(self.map_output(scope, input.clone(), output).await?);
        }

        Ok(items)
    }

    async fn map_output(&self, scope: &str, input: I, output: O) -> Result<Vec<Item>> {
        let mapper = self
            .output_mapper
            .as_ref()
            .ok_or_else(|| self.missing("output mapper"))?;

        self.settings
            .invoke(mapper(self.client.clone(), scope.to_string(), input, output))
            .await
    }
}

#[async_trait]
impl<C, I, O> Adapter for DescribeOnlyAdapter<C, I, O>
where
    C: Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
    O: Send + 'static,
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
        // A paginator covers every call once GET goes through the list
        let paginates_everything = self.paginator_builder.is_some() && self.use_list_for_get;
        if self.describe_func.is_none() && !paginates_everything {
            return Err(self.missing("describe func"));
        }
        if self.input_mapper_get.is_none() {
            return Err(self.missing("input mapper for GET"));
        }
        if self.input_mapper_list.is_none() {
            return Err(self.missing("input mapper for LIST"));
        }
        if self.output_mapper.is_none() {
            return Err(self.missing("output mapper"));
        }
        Ok(())
    }

    async fn get(&self, scope: &str, query: &str, ignore_cache: bool) -> Result<Item> {
        self.settings.check_scope(scope)?;
        self.validate()?;

        let key = self.settings.cache_key(QueryMethod::Get, scope, Some(query));
        match self.settings.lookup(&key, ignore_cache) {
            Lookup::Hit(items) => return exactly_one(&self.settings, items, query),
            Lookup::Error(err) => return Err(err),
            Lookup::Miss => {}
        }

        match self.get_items(scope, query).await {
            Ok(item) => {
                self.settings.store_items(std::slice::from_ref(&item), &key);
                Ok(item)
            }
            Err(err) => Err(self.settings.process_error(err, &key)),
        }
    }

    async fn list(&self, scope: &str, ignore_cache: bool) -> Result<Vec<Item>> {
        self.settings.check_scope(scope)?;
        self.validate()?;

        let key = self.settings.cache_key(QueryMethod::List, scope, None);
        match self.settings.lookup(&key, ignore_cache) {
            Lookup::Hit(items) => return Ok(items),
            Lookup::Error(err) => return Err(err),
            Lookup::Miss => {}
        }

        match self.list_items(scope).await {
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

        if self.input_mapper_search.is_none() {
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
