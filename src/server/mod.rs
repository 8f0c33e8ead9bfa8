pub mod handlers;
mod summary;
mod types;

pub use handlers::AppState;
pub use types::ErrorResponse;

use crate::{Result, config::Config};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    routing::any,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

/// Mounts the relay on `path`. Every response leaving the router, including
/// preflights and errors, carries the CORS headers.
pub fn router(state: AppState, path: &str) -> Router {
    let cors = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);

    Router::new()
        .route(path, any(handlers::relay))
        .with_state(state)
        .layer(body_limit)
        .layer(cors)
}

pub async fn run(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state, &config.server.path);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);
    info!(
        "Relaying {} to {} (timeout {}s, verbosity {:?})",
        config.server.path,
        config.upstream.url(),
        config.upstream.timeout_secs,
        config.server.logs.verbosity
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining in-flight requests");
}
