use anyhow::Context;
use aws_source::{
    account,
    config::Config,
    dynamodb::{self, DynamodbClients},
    web::{route::root, AppState, SharedState},
    AdapterRegistry,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let sdk_config = aws_config::load_from_env().await;
    let region = account::region(&sdk_config)?;
    let account_id = account::resolve_account_id(&sdk_config, config.account_id()).await?;
    info!("serving account {account_id} in {region}");

    let clients = DynamodbClients::builder(&sdk_config)
        .endpoint_url(config.endpoint_url())
        .build();
    let options = config.adapter_options(&account_id, &region);

    let mut registry = AdapterRegistry::new();
    for adapter in dynamodb::adapters(&clients, &options) {
        if config.allows(adapter.item_type()) {
            registry.add(adapter)?;
        }
    }
    info!("{} adapters registered", registry.len());

    let state: SharedState = Arc::new(AppState::new(registry));

    let app = root::router(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(true),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Micros)
                    .include_headers(true),
            ),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    info!("listening on {addr}");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .context("server error")
}
