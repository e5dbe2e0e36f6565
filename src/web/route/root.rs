use super::{FromValidate, HttpError, Json, SharedState};
use crate::item::{Item, Query, QueryMethod};

use axum::{
    extract::State,
    response::{self, IntoResponse},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};
use ulid::Ulid;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_query"))]
struct RawQueryBody {
    #[serde(rename = "type")]
    #[validate(required, length(min = 1, max = 255))]
    item_type: Option<String>,
    #[validate(required)]
    method: Option<QueryMethod>,
    #[validate(length(max = 2048))]
    query: Option<String>,
    #[validate(required, length(min = 1, max = 255))]
    scope: Option<String>,
    ignore_cache: Option<bool>,
}

fn validate_query(body: &RawQueryBody) -> Result<(), ValidationError> {
    let needs_query = matches!(body.method, Some(QueryMethod::Get | QueryMethod::Search));
    if needs_query && body.query.as_deref().map_or(true, str::is_empty) {
        let mut err = ValidationError::new("query");
        err.message = Some("query is required for GET and SEARCH".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug)]
struct QueryBody {
    query: Query,
    ignore_cache: bool,
}

impl FromValidate for QueryBody {
    type Validatable = RawQueryBody;

    fn from(b: RawQueryBody) -> QueryBody {
        QueryBody {
            query: Query::new(
                b.item_type.unwrap_or_default(),
                b.method.unwrap_or(QueryMethod::Get),
                b.query.unwrap_or_default(),
                b.scope.unwrap_or_default(),
            ),
            ignore_cache: b.ignore_cache.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct QueryResponse {
    items: Vec<Item>,
}

async fn index(State(state): State<SharedState>) -> impl IntoResponse {
    response::Json(state.registry().describe())
}

async fn query(
    State(state): State<SharedState>,
    Json(body): Json<QueryBody>,
) -> Result<impl IntoResponse, HttpError> {
    let QueryBody {
        query,
        ignore_cache,
    } = body;

    let span = info_span!(
        "query",
        request_id = %Ulid::new(),
        item_type = %query.item_type,
        method = %query.method,
        scope = %query.scope,
    );

    async move {
        match state.registry().query(&query, ignore_cache).await {
            Ok(items) => {
                info!("found {} items", items.len());
                Ok(response::Json(QueryResponse { items }))
            }
            Err(err) => {
                warn!("{err}");
                Err(HttpError::from(err))
            }
        }
    }
    .instrument(span)
    .await
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/adapters", get(index))
        .route("/query", post(query))
        .with_state(state)
}
