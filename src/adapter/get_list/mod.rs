mod builder;

pub use builder::GetListAdapterBuilder;

use super::{handle_tags_error, search_arn, Adapter, AdapterMetadata, AdapterSettings};
use crate::{
    cache::Lookup,
    error::{QueryError, Result},
    item::{Item, QueryMethod},
};

use axum::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::{collections::BTreeMap, future::Future};

type Tags = BTreeMap<String, String>;
type GetFunc<C, T> = Box<dyn Fn(C, String, String) -> BoxFuture<'static, Result<T>> + Send + Sync>;
type ListFunc<C, T> = Box<dyn Fn(C, String) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>;
type SearchFunc<C, T> =
    Box<dyn Fn(C, String, String) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>;
type ItemMapper<T> = Box<dyn Fn(&str, &T) -> Result<Item> + Send + Sync>;
type ListTagsFunc<C, T> = Box<dyn Fn(C, &T) -> BoxFuture<'static, Result<Tags>> + Send + Sync>;

/// An adapter for APIs with separate get and list calls that both return the
/// same raw type.
pub struct GetListAdapter<C, T> {
    settings: AdapterSettings,
    client: C,
    get_func: Option<GetFunc<C, T>>,
    list_func: Option<ListFunc<C, T>>,
    search_func: Option<SearchFunc<C, T>>,
    item_mapper: Option<ItemMapper<T>>,
    list_tags_func: Option<ListTagsFunc<C, T>>,
    disable_list: bool,
}

impl<C, T> GetListAdapter<C, T>
where
    C: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn builder(settings: AdapterSettings, client: C) -> GetListAdapterBuilder<C, T> {
        GetListAdapterBuilder::new(settings, client)
    }

    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn missing(&self, what: &str) -> QueryError {
        QueryError::config(format!("{}: {what} is not set", self.settings.name()))
    }

    async fn map_item(&self, scope: &str, raw: &T) -> Result<Item> {
        let mapper = self
            .item_mapper
            .as_ref()
            .ok_or_else(|| self.missing("item mapper"))?;
        let item = mapper(scope, raw)?;

        match self.list_tags_func.as_ref() {
            Some(list_tags) => {
                let tags = self
                    .settings
                    .invoke(list_tags(self.client.clone(), raw))
                    .await
                    .unwrap_or_else(handle_tags_error);
                Ok(item.set_tags(tags))
            }
            None => Ok(item),
        }
    }

    /// Maps every raw resource, dropping the ones that fail.
    async fn map_items(&self, scope: &str, raws: Vec<T>) -> Vec<Item> {
        let mut items = Vec::with_capacity(raws.len());

        for raw in raws.iter() {
            match self.map_item(scope, raw).await {
                Ok(item) => items.push(item),
                Err(err) => self.settings.record_dropped(&err),
            }
        }

        items
    }

    async fn get_item(&self, scope: &str, query: &str) -> Result<Item> {
        let get = self
            .get_func
            .as_ref()
            .ok_or_else(|| self.missing("get func"))?;

        let raw = self
            .settings
            .invoke(get(self.client.clone(), scope.to_string(), query.to_string()))
            .await?;
        self.map_item(scope, &raw).await
    }

    async fn list_items(&self, scope: &str) -> Result<Vec<Item>> {
        let list = self
            .list_func
            .as_ref()
            .ok_or_else(|| self.missing("list func"))?;

        let raws = self
            .settings
            .invoke(list(self.client.clone(), scope.to_string()))
            .await?;
        Ok(self.map_items(scope, raws).await)
    }

    async fn search_items(&self, scope: &str, query: &str) -> Result<Vec<Item>> {
        let search = self
            .search_func
            .as_ref()
            .ok_or_else(|| self.missing("search func"))?;

        let raws = self
            .settings
            .invoke(search(self.client.clone(), scope.to_string(), query.to_string()))
            .await?;
        Ok(self.map_items(scope, raws).await)
    }
}

#[async_trait]
impl<C, T> Adapter for GetListAdapter<C, T>
where
    C: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
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
        if !self.disable_list && self.list_func.is_none() {
            return Err(self.missing("list func"));
        }
        if self.item_mapper.is_none() {
            return Err(self.missing("item mapper"));
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

        match self.get_item(scope, query).await {
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

        if self.search_func.is_none() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapter::test_utils::{generation, item, settings, SCOPE},
        error::ErrorKind,
    };
    use std::sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    };

    /// Raw resources are `(name, generation)` pairs; an empty name can't be
    /// mapped.
    type Raw = (String, u64);

    fn map_raw(_scope: &str, raw: &Raw) -> Result<Item> {
        if raw.0.is_empty() {
            return Err(QueryError::other("raw resource has no name"));
        }
        Ok(item(&raw.0, raw.1))
    }

    fn adapter(counter: Arc<AtomicU64>) -> GetListAdapterBuilder<(), Raw> {
        let get_counter = Arc::clone(&counter);
        let list_counter = counter;

        GetListAdapter::builder(settings(), ())
            .set_get_func(move |_client, _scope, query: String| {
                let generation = get_counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok((query, generation)) }
            })
            .set_list_func(move |_client, _scope| {
                let generation = list_counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    Ok(vec![
                        ("a".to_string(), generation),
                        (String::new(), generation),
                        ("b".to_string(), generation),
                    ])
                }
            })
            .set_item_mapper(map_raw)
    }

    #[tokio::test]
    async fn it_gets_an_item() {
        let adapter = adapter(Arc::new(AtomicU64::new(0))).build();
        let item = adapter.get(SCOPE, "a", false).await.unwrap();
        assert_eq!(item.unique_attribute_value(), Some("a".to_string()));
    }

    #[tokio::test]
    async fn it_drops_and_counts_items_that_fail_to_map() {
        let adapter = adapter(Arc::new(AtomicU64::new(0))).build();

        let items = adapter.list(SCOPE, false).await.unwrap();
        let names: Vec<Option<String>> = items.iter().map(Item::unique_attribute_value).collect();
        assert_eq!(names, vec![Some("a".to_string()), Some("b".to_string())]);
        assert_eq!(adapter.settings().dropped_items(), 1);
    }

    #[tokio::test]
    async fn it_returns_nothing_when_list_is_disabled() {
        let counter = Arc::new(AtomicU64::new(0));
        let adapter = adapter(Arc::clone(&counter))
            .set_disable_list(true)
            .build();

        assert!(adapter.list(SCOPE, false).await.unwrap().is_empty());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn it_answers_gets_from_a_cached_list() {
        let counter = Arc::new(AtomicU64::new(0));
        let adapter = adapter(Arc::clone(&counter)).build();

        adapter.list(SCOPE, false).await.unwrap();
        let item = adapter.get(SCOPE, "b", false).await.unwrap();

        assert_eq!(generation(&item), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn it_caches_gets_and_lists() {
        let adapter = adapter(Arc::new(AtomicU64::new(0))).build();

        let first = adapter.get(SCOPE, "a", false).await.unwrap();
        let cached = adapter.get(SCOPE, "a", false).await.unwrap();
        assert_eq!(generation(&first), generation(&cached));
        let fresh = adapter.get(SCOPE, "a", true).await.unwrap();
        assert_ne!(generation(&first), generation(&fresh));

        let first = adapter.list(SCOPE, false).await.unwrap();
        let cached = adapter.list(SCOPE, false).await.unwrap();
        assert_eq!(generation(&first[0]), generation(&cached[0]));
        let fresh = adapter.list(SCOPE, true).await.unwrap();
        assert_ne!(generation(&first[0]), generation(&fresh[0]));
    }

    #[tokio::test]
    async fn it_searches_by_arn_by_default() {
        let adapter = adapter(Arc::new(AtomicU64::new(0))).build();

        let items = adapter
            .search(SCOPE, "arn:aws:test:eu-west-2:123456789012:thing/a", false)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unique_attribute_value(), Some("a".to_string()));
    }

    #[tokio::test]
    async fn it_searches_with_a_custom_func() {
        let adapter = adapter(Arc::new(AtomicU64::new(0)))
            .set_search_func(|_client, _scope, query: String| async move {
                Ok(vec![(format!("{query}-1"), 1), (format!("{query}-2"), 1)])
            })
            .build();

        let items = adapter.search(SCOPE, "table", false).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn it_marks_items_whose_tags_failed() {
        let adapter = adapter(Arc::new(AtomicU64::new(0)))
            .set_list_tags_func(|_client, raw: &Raw| {
                let name = raw.0.clone();
                async move {
                    match name.as_str() {
                        "a" => Ok(BTreeMap::from([("env".to_string(), "prod".to_string())])),
                        _ => Err(QueryError::from_status(403, "access denied")),
                    }
                }
            })
            .build();

        let item = adapter.get(SCOPE, "a", false).await.unwrap();
        assert_eq!(item.tags().get("env"), Some(&"prod".to_string()));

        let item = adapter.get(SCOPE, "b", false).await.unwrap();
        assert_eq!(item.tags().get("errorGettingTags"), Some(&"true".to_string()));
    }

    #[tokio::test]
    async fn it_validates_required_functions() {
        let adapter: GetListAdapter<(), Raw> = GetListAdapter::builder(settings(), ())
            .set_item_mapper(map_raw)
            .build();
        assert_eq!(adapter.validate().unwrap_err().kind(), ErrorKind::Config);

        let adapter: GetListAdapter<(), Raw> = GetListAdapter::builder(settings(), ())
            .set_get_func(|_client, _scope, query: String| async move { Ok((query, 1)) })
            .set_item_mapper(map_raw)
            .set_disable_list(true)
            .build();
        assert!(adapter.validate().is_ok());
    }

    #[tokio::test]
    async fn it_caches_not_found_errors() {
        let counter = Arc::new(AtomicU64::new(0));
        let calls = Arc::clone(&counter);

        let adapter = adapter(Arc::new(AtomicU64::new(0)))
            .set_get_func(move |_client, _scope, _query| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<Raw, _>(QueryError::from_status(400, "ResourceNotFoundException")) }
            })
            .build();

        for _ in 0..2 {
            let err = adapter.get(SCOPE, "gone", false).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        adapter.get(SCOPE, "gone", true).await.unwrap_err();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
