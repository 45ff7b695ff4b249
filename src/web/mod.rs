//! HTTP exposition of the gauge registry.
//!
//! Serves `GET /metrics` in the Prometheus text format for pull-based scraping,
//! plus a small health endpoint. The server only ever reads gauge values; all
//! writes come from the poll loop.

pub mod config;

pub use config::ServerConfig;

use crate::error::{Result, SensorError};
use crate::registry::SensorMetrics;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Content type Prometheus expects from a text-format scrape target.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &ServerConfig, metrics: Arc<SensorMetrics>) -> Router {
    let mut app = Router::new()
        .route("/metrics", get(render_metrics))
        .route("/api/health", get(health_check))
        .with_state(metrics);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(TraceLayer::new_for_http())
}

/// Bind the listener and serve scrape requests until the process exits.
pub async fn start_server(config: ServerConfig, metrics: Arc<SensorMetrics>) -> Result<()> {
    let app = create_app(&config, metrics);

    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| SensorError::config_error(format!("invalid bind address: {}", e)))?;

    info!("metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SensorError::web_server_error(format!("failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| SensorError::web_server_error(format!("server error: {}", e)))?;

    Ok(())
}

async fn render_metrics(State(metrics): State<Arc<SensorMetrics>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        metrics.render(),
    )
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
