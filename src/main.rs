use heron::api::{self, app_state::AppState};
use heron::config::loader::ConfigLoader;
use heron::observability::{
    ObservabilityState, create_observability_router, init_tracing, metrics_middleware,
};
use heron::services::{create_trace_id_generator, create_upstream_client};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("heron");

    info!("Starting Heron...");

    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
    ));

    let upstream = create_upstream_client(&config.upstream)?;
    info!("Upstream client initialized for {}", config.upstream.base_url);

    let trace = create_trace_id_generator();

    let app_state = AppState::new(upstream, trace, observability_state.metrics.clone());
    info!("Application state created");

    let api_router = api::create_router(app_state);
    let metrics_state = observability_state.clone();
    let router = create_observability_router(observability_state)
        .merge(api_router)
        .layer(axum::middleware::from_fn(move |req, next| {
            let state = metrics_state.clone();
            async move { metrics_middleware(req, next, state).await }
        }));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
