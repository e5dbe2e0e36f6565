use crate::error::{ErrorKind, QueryError};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("validation error")]
    Validation(ValidationErrors),
    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),
    #[error("{}", .0.message())]
    Query(#[from] QueryError),
    #[error("Internal Server Error")]
    Server(#[from] anyhow::Error),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if let Self::Server(err) = &self {
            error!("{err:#}");
        }

        match serde_json::to_vec(&self.body()) {
            Ok(body) => {
                let status = self.status_code();
                let header = [("content-type", "application/json")];
                (status, header, body).into_response()
            }
            Err(err) => {
                error!("{:#?}", err);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let header = [("content-type", "text/plain")];
                (status, header, format!("{err}")).into_response()
            }
        }
    }
}

impl HttpError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Query(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::NoScope => StatusCode::BAD_REQUEST,
                ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ErrorKind::Other => StatusCode::BAD_GATEWAY,
            },
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Body {
        Body {
            message: format!("{self}"),
            kind: match self {
                Self::Query(err) => Some(err.kind()),
                _ => None,
            },
            errors: self.validation_errors(),
        }
    }

    fn validation_errors(&self) -> Vec<ValidationErrorContent> {
        match self {
            Self::Validation(errors) => ValidationErrorContent::from_errors(errors),
            _ => vec![],
        }
    }
}

#[derive(Debug, Serialize)]
struct Body {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationErrorContent>,
}

#[derive(Debug, Serialize)]
struct ValidationErrorContent {
    field: String,
    messages: Vec<String>,
}

impl ValidationErrorContent {
    fn from_errors(errors: &ValidationErrors) -> Vec<Self> {
        let mut results: Vec<Self> = vec![];
        reduce(errors, "", &mut results);
        results.sort_by(|a, b| a.field.cmp(&b.field));
        results
    }
}

fn reduce(errors: &ValidationErrors, prefix: &str, acc: &mut Vec<ValidationErrorContent>) {
    for (key, val) in errors.errors() {
        match val {
            ValidationErrorsKind::Struct(e) => {
                let p = format!("{}{}.", prefix, key);
                reduce(e, &p, acc);
            }
            ValidationErrorsKind::List(m) => {
                for (n, e) in m {
                    let p = format!("{}{}[{}].", prefix, key, n);
                    reduce(e, &p, acc);
                }
            }
            ValidationErrorsKind::Field(e) => {
                let field = format!("{}{}", prefix, key);
                let messages = e
                    .iter()
                    .map(|err| {
                        if err.code == "required" {
                            err.code.to_string()
                        } else {
                            match err.message.as_ref() {
                                Some(message) => message.to_string(),
                                None => "Invalid value".to_string(),
                            }
                        }
                    })
                    .collect();
                acc.push(ValidationErrorContent { field, messages });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_query_errors_to_statuses() {
        let cases = [
            (QueryError::not_found("gone"), StatusCode::NOT_FOUND),
            (QueryError::no_scope("elsewhere"), StatusCode::BAD_REQUEST),
            (QueryError::config("unset"), StatusCode::INTERNAL_SERVER_ERROR),
            (QueryError::timeout("slow"), StatusCode::GATEWAY_TIMEOUT),
            (QueryError::other("broken"), StatusCode::BAD_GATEWAY),
        ];

        for (err, status) in cases {
            assert_eq!(HttpError::from(err).status_code(), status);
        }
    }

    #[test]
    fn it_serializes_the_kind_of_query_errors() {
        let body = HttpError::from(QueryError::not_found("table people not found")).body();
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({
                "message": "table people not found",
                "kind": "NOT_FOUND",
            })
        );
    }

    #[test]
    fn it_hides_internal_errors() {
        let body = HttpError::from(anyhow::anyhow!("secret")).body();
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({ "message": "Internal Server Error" })
        );
    }
}
