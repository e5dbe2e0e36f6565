use crate::error::Result;

use axum::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;

/// Walks the pages of a provider response.
#[async_trait]
pub trait Paginator<O>: Send {
    fn has_more_pages(&self) -> bool;

    async fn next_page(&mut self) -> Result<O>;
}

type FetchPage<O> = Box<dyn Fn(Option<String>) -> BoxFuture<'static, Result<O>> + Send + Sync>;
type NextToken<O> = Box<dyn Fn(&O) -> Option<String> + Send + Sync>;

/// A paginator driven by a continuation token. It stops when the provider
/// returns no token, an empty token, or the token it was just given.
pub struct TokenPaginator<O> {
    fetch: FetchPage<O>,
    next_token: NextToken<O>,
    token: Option<String>,
    done: bool,
}

impl<O> TokenPaginator<O> {
    pub fn new<F, Fut, N>(fetch: F, next_token: N) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
        N: Fn(&O) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            fetch: Box::new(move |token| fetch(token).boxed()),
            next_token: Box::new(next_token),
            token: None,
            done: false,
        }
    }
}

#[async_trait]
impl<O: Send + 'static> Paginator<O> for TokenPaginator<O> {
    fn has_more_pages(&self) -> bool {
        !self.done
    }

    async fn next_page(&mut self) -> Result<O> {
        let output = (self.fetch)(self.token.clone()).await;
        let output = match output {
            Ok(output) => output,
            Err(err) => {
                self.done = true;
                return Err(err);
            }
        };

        match (self.next_token)(&output) {
            Some(token) if !token.is_empty() && self.token.as_deref() != Some(token.as_str()) => {
                self.token = Some(token);
            }
            _ => {
                self.done = true;
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    async fn drain<O: Send + 'static>(paginator: &mut dyn Paginator<O>) -> Result<Vec<O>> {
        let mut pages = vec![];
        while paginator.has_more_pages() {
            pages.push(paginator.next_page().await?);
        }
        Ok(pages)
    }

    #[tokio::test]
    async fn it_follows_tokens_until_there_are_none() {
        let mut paginator = TokenPaginator::new(
            |token: Option<String>| async move {
                let next = match token.as_deref() {
                    None => Some("page-2".to_string()),
                    Some("page-2") => Some("page-3".to_string()),
                    _ => None,
                };
                Ok((token, next))
            },
            |output: &(Option<String>, Option<String>)| output.1.clone(),
        );

        let pages = drain(&mut paginator).await.unwrap();
        let tokens: Vec<Option<String>> = pages.into_iter().map(|(token, _)| token).collect();
        assert_eq!(
            tokens,
            vec![None, Some("page-2".to_string()), Some("page-3".to_string())]
        );
    }

    #[tokio::test]
    async fn it_stops_when_the_token_repeats() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut paginator = TokenPaginator::new(
            move |_token: Option<String>| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok("same-token".to_string()) }
            },
            |output: &String| Some(output.clone()),
        );

        let pages = drain(&mut paginator).await.unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn it_stops_on_an_empty_token() {
        let mut paginator = TokenPaginator::new(
            |_token: Option<String>| async { Ok(String::new()) },
            |output: &String| Some(output.clone()),
        );

        let pages = drain(&mut paginator).await.unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[tokio::test]
    async fn it_stops_after_an_error() {
        let mut paginator = TokenPaginator::new(
            |_token: Option<String>| async { Err::<String, _>(QueryError::other("boom")) },
            |output: &String| Some(output.clone()),
        );

        assert!(paginator.next_page().await.is_err());
        assert!(!paginator.has_more_pages());
    }
}
