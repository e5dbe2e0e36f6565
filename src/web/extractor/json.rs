use crate::web::error::HttpError;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest},
    http::Request,
};
use serde::Deserialize;
use validator::Validate;

/// A JSON body that is validated before the handler sees it. Bodies which
/// can't be deserialized are rejected with 422, invalid ones with 400.
pub struct Json<J>(pub J);

#[async_trait]
impl<S, B, J> FromRequest<S, B> for Json<J>
where
    B: Send + 'static,
    S: Send + Sync,
    J: FromValidate + 'static,
    axum::Json<<J as FromValidate>::Validatable>: FromRequest<S, B, Rejection = JsonRejection>,
{
    type Rejection = HttpError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(raw) = axum::Json::<<J as FromValidate>::Validatable>::from_request(req, state)
            .await
            .map_err(|err| HttpError::Unprocessable(err.body_text()))?;
        raw.validate().map_err(HttpError::Validation)?;
        Ok(Self(FromValidate::from(raw)))
    }
}

/// Converts a validated raw body into the type handlers work with.
pub trait FromValidate {
    type Validatable: Validate + for<'de> Deserialize<'de>;

    fn from(value: Self::Validatable) -> Self;
}
