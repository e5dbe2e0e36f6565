use super::*;

pub struct AlwaysGetAdapterBuilder<C, LI, LO, GI> {
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

impl<C, LI, LO, GI> AlwaysGetAdapterBuilder<C, LI, LO, GI>
where
    C: Clone + Send + Sync + 'static,
    LI: Clone + Send + Sync + 'static,
    LO: Send + 'static,
    GI: Send + 'static,
{
    pub fn new(settings: AdapterSettings, client: C) -> Self {
        Self {
            settings,
            client,
            list_input: None,
            list_func: None,
            list_paginator_builder: None,
            list_output_mapper: None,
            get_input_mapper: None,
            get_func: None,
            search_input_mapper: None,
            search_get_input_mapper: None,
            always_search_arns: false,
            disable_list: false,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }

    /// The input every LIST starts from.
    pub fn set_list_input(self, list_input: LI) -> Self {
        Self {
            list_input: Some(list_input),
            ..self
        }
    }

    pub fn set_list_func<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, LI) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<LO>> + Send + 'static,
    {
        Self {
            list_func: Some(Box::new(move |client: C, input: LI| f(client, input).boxed())),
            ..self
        }
    }

    /// Takes precedence over the list func when both are set.
    pub fn set_list_paginator_builder<F, P>(self, f: F) -> Self
    where
        F: Fn(C, LI) -> P + Send + Sync + 'static,
        P: Paginator<LO> + 'static,
    {
        Self {
            list_paginator_builder: Some(Box::new(move |client: C, input: LI| {
                Box::new(f(client, input)) as Box<dyn Paginator<LO>>
            })),
            ..self
        }
    }

    /// Turns one page of list output into the inputs of the gets to run.
    pub fn set_list_output_mapper<F>(self, f: F) -> Self
    where
        F: Fn(&LO, &LI) -> Result<Vec<GI>> + Send + Sync + 'static,
    {
        Self {
            list_output_mapper: Some(Box::new(f)),
            ..self
        }
    }

    pub fn set_get_input_mapper<F>(self, f: F) -> Self
    where
        F: Fn(&str, &str) -> GI + Send + Sync + 'static,
    {
        Self {
            get_input_mapper: Some(Box::new(f)),
            ..self
        }
    }

    /// Fetches and fully maps one item for `(client, scope, input)`.
    pub fn set_get_func<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, String, GI) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Item>> + Send + 'static,
    {
        Self {
            get_func: Some(Box::new(move |client: C, scope: String, input: GI| {
                f(client, scope, input).boxed()
            })),
            ..self
        }
    }

    /// Searches by listing with a custom input, then getting every result.
    pub fn set_search_input_mapper<F>(self, f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<LI> + Send + Sync + 'static,
    {
        Self {
            search_input_mapper: Some(Box::new(f)),
            ..self
        }
    }

    /// Searches with a single get.
    pub fn set_search_get_input_mapper<F>(self, f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<GI> + Send + Sync + 'static,
    {
        Self {
            search_get_input_mapper: Some(Box::new(f)),
            ..self
        }
    }

    /// Treat every search as an ARN search, even with search mappers set.
    pub fn set_always_search_arns(self, always_search_arns: bool) -> Self {
        Self {
            always_search_arns,
            ..self
        }
    }

    pub fn set_disable_list(self, disable_list: bool) -> Self {
        Self {
            disable_list,
            ..self
        }
    }

    /// How many gets may be in flight at once during a list.
    pub fn set_max_parallel(self, max_parallel: usize) -> Self {
        Self {
            max_parallel: max_parallel.max(1),
            ..self
        }
    }

    pub fn build(self) -> AlwaysGetAdapter<C, LI, LO, GI> {
        AlwaysGetAdapter {
            settings: self.settings,
            client: self.client,
            list_input: self.list_input,
            list_func: self.list_func,
            list_paginator_builder: self.list_paginator_builder,
            list_output_mapper: self.list_output_mapper,
            get_input_mapper: self.get_input_mapper,
            get_func: self.get_func,
            search_input_mapper: self.search_input_mapper,
            search_get_input_mapper: self.search_get_input_mapper,
            always_search_arns: self.always_search_arns,
            disable_list: self.disable_list,
            max_parallel: self.max_parallel,
        }
    }
}
