use std::sync::Arc;

use rainfall_server::cache::ResultCache;
use rainfall_server::config::ServerConfig;
use rainfall_server::gateway::RainfallGateway;
use rainfall_server::upstream::EnvironmentClient;
use rainfall_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Failed to read configuration");

    // Create upstream client
    let upstream =
        EnvironmentClient::new(config.upstream.clone()).expect("Failed to create upstream client");

    // One cache for the whole process, handed to the gateway
    let cache = ResultCache::new(&config.cache);
    let gateway = RainfallGateway::new(Arc::new(upstream), cache);

    let app = create_router(AppState::new(gateway));

    info!(
        upstream = %config.upstream.base_url,
        cache_ttl_secs = config.cache.ttl.as_secs(),
        "Rainfall API listening on http://{}",
        config.bind_addr
    );
    info!("  GET  /health                             - Health check");
    info!("  GET  /rainfall/id/{{stationId}}/readings  - Latest readings for a station");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
