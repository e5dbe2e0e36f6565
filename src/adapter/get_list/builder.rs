use super::*;

pub struct GetListAdapterBuilder<C, T> {
    settings: AdapterSettings,
    client: C,
    get_func: Option<GetFunc<C, T>>,
    list_func: Option<ListFunc<C, T>>,
    search_func: Option<SearchFunc<C, T>>,
    item_mapper: Option<ItemMapper<T>>,
    list_tags_func: Option<ListTagsFunc<C, T>>,
    disable_list: bool,
}

impl<C, T> GetListAdapterBuilder<C, T>
where
    C: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    pub fn new(settings: AdapterSettings, client: C) -> Self {
        Self {
            settings,
            client,
            get_func: None,
            list_func: None,
            search_func: None,
            item_mapper: None,
            list_tags_func: None,
            disable_list: false,
        }
    }

    /// Fetches one raw resource for `(client, scope, query)`.
    pub fn set_get_func<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            get_func: Some(Box::new(move |client: C, scope: String, query: String| {
                f(client, scope, query).boxed()
            })),
            ..self
        }
    }

    /// Fetches every raw resource in `(client, scope)`.
    pub fn set_list_func<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        Self {
            list_func: Some(Box::new(move |client: C, scope: String| {
                f(client, scope).boxed()
            })),
            ..self
        }
    }

    /// Fetches the raw resources matching `(client, scope, query)`. Without
    /// one, searches expect an ARN.
    pub fn set_search_func<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        Self {
            search_func: Some(Box::new(move |client: C, scope: String, query: String| {
                f(client, scope, query).boxed()
            })),
            ..self
        }
    }

    pub fn set_item_mapper<F>(self, f: F) -> Self
    where
        F: Fn(&str, &T) -> Result<Item> + Send + Sync + 'static,
    {
        Self {
            item_mapper: Some(Box::new(f)),
            ..self
        }
    }

    /// Reads the tags of a raw resource. Anything the returned future needs
    /// must be taken from the resource before it is returned.
    pub fn set_list_tags_func<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, &T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Tags>> + Send + 'static,
    {
        Self {
            list_tags_func: Some(Box::new(move |client: C, raw: &T| f(client, raw).boxed())),
            ..self
        }
    }

    pub fn set_disable_list(self, disable_list: bool) -> Self {
        Self {
            disable_list,
            ..self
        }
    }

    pub fn build(self) -> GetListAdapter<C, T> {
        GetListAdapter {
            settings: self.settings,
            client: self.client,
            get_func: self.get_func,
            list_func: self.list_func,
            search_func: self.search_func,
            item_mapper: self.item_mapper,
            list_tags_func: self.list_tags_func,
            disable_list: self.disable_list,
        }
    }
}
