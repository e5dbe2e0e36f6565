use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

/// HTTP statuses which mean the item does not exist for this adapter: the
/// input was rejected, access was denied or nothing was found.
const NOT_FOUND_STATUSES: &[u16] = &[400, 403, 404];

#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    NoScope,
    Config,
    Timeout,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::NoScope => write!(f, "NO_SCOPE"),
            ErrorKind::Config => write!(f, "CONFIG"),
            ErrorKind::Timeout => write!(f, "TIMEOUT"),
            ErrorKind::Other => write!(f, "OTHER"),
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct QueryError {
    kind: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

impl QueryError {
    pub fn new<T: Into<String>>(kind: ErrorKind, message: T) -> Self {
        Self {
            kind,
            message: message.into(),
            scope: None,
        }
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn no_scope<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::NoScope, message)
    }

    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn timeout<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn other<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::Other, message)
    }

    /// Classifies a provider response by its HTTP status code.
    pub fn from_status<T: Into<String>>(status: u16, message: T) -> Self {
        if NOT_FOUND_STATUSES.contains(&status) {
            Self::not_found(message)
        } else {
            Self::other(message)
        }
    }

    pub fn with_scope<T: Into<String>>(self, scope: T) -> Self {
        Self {
            scope: Some(scope.into()),
            ..self
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Whether retrying the same query could give a different answer. Errors
    /// which can't be fixed by retrying are the only ones worth caching.
    pub fn can_retry(&self) -> bool {
        !matches!(self.kind, ErrorKind::NotFound | ErrorKind::NoScope)
    }
}

impl<E> From<SdkError<E>> for QueryError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: SdkError<E>) -> QueryError {
        let status = err.raw_response().map(|res| res.status().as_u16());
        let message = format!("{}", DisplayErrorContext(&err));

        match status {
            Some(status) => QueryError::from_status(status, message),
            None => QueryError::other(message),
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> QueryError {
        QueryError::other(format!("conversion error: {err}"))
    }
}
