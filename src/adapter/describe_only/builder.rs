use super::*;

pub struct DescribeOnlyAdapterBuilder<C, I, O> {
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

impl<C, I, O> DescribeOnlyAdapterBuilder<C, I, O>
where
    C: Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    pub fn new(settings: AdapterSettings, client: C) -> Self {
        Self {
            settings,
            client,
            input_mapper_get: None,
            input_mapper_list: None,
            input_mapper_search: None,
            paginator_builder: None,
            describe_func: None,
            output_mapper: None,
            use_list_for_get: false,
        }
    }

    /// Maps `(scope, query)` to the input of a GET.
    pub fn set_input_mapper_get<F>(self, f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<I> + Send + Sync + 'static,
    {
        Self {
            input_mapper_get: Some(Box::new(f)),
            ..self
        }
    }

    /// Maps `scope` to the input of a LIST.
    pub fn set_input_mapper_list<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> Result<I> + Send + Sync + 'static,
    {
        Self {
            input_mapper_list: Some(Box::new(f)),
            ..self
        }
    }

    /// Maps `(client, scope, query)` to the input of a SEARCH. Without one,
    /// searches expect an ARN.
    pub fn set_input_mapper_search<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<I>> + Send + 'static,
    {
        Self {
            input_mapper_search: Some(Box::new(move |client: C, scope: String, query: String| {
                f(client, scope, query).boxed()
            })),
            ..self
        }
    }

    pub fn set_paginator_builder<F, P>(self, f: F) -> Self
    where
        F: Fn(C, I) -> P + Send + Sync + 'static,
        P: Paginator<O> + 'static,
    {
        Self {
            paginator_builder: Some(Box::new(move |client: C, input: I| {
                Box::new(f(client, input)) as Box<dyn Paginator<O>>
            })),
            ..self
        }
    }

    pub fn set_describe_func<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
    {
        Self {
            describe_func: Some(Box::new(move |client: C, input: I| f(client, input).boxed())),
            ..self
        }
    }

    /// Maps `(client, scope, input, output)` to items.
    pub fn set_output_mapper<F, Fut>(self, f: F) -> Self
    where
        F: Fn(C, String, I, O) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Item>>> + Send + 'static,
    {
        Self {
            output_mapper: Some(Box::new(
                move |client: C, scope: String, input: I, output: O| {
                    f(client, scope, input, output).boxed()
                },
            )),
            ..self
        }
    }

    /// Treat the GET output as a list and pick the item whose unique value
    /// matches the query.
    pub fn set_use_list_for_get(self, use_list_for_get: bool) -> Self {
        Self {
            use_list_for_get,
            ..self
        }
    }

    pub fn build(self) -> DescribeOnlyAdapter<C, I, O> {
        DescribeOnlyAdapter {
            settings: self.settings,
            client: self.client,
            input_mapper_get: self.input_mapper_get,
            input_mapper_list: self.input_mapper_list,
            input_mapper_search: self.input_mapper_search,
            paginator_builder: self.paginator_builder,
            describe_func: self.describe_func,
            output_mapper: self.output_mapper,
            use_list_for_get: self.use_list_for_get,
        }
    }
}
