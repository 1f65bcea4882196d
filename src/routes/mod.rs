// HTTP + WebSocket routes

mod cors;
mod http;
mod ws;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::watch;

use crate::collector::MetricsCollector;
use crate::config::AppConfig;
use crate::docker_repo::ContainerRuntime;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) collector: Arc<MetricsCollector>,
    pub(crate) runtime: Option<Arc<dyn ContainerRuntime>>,
    pub(crate) active_streams: Arc<AtomicUsize>,
    pub(crate) shutdown: watch::Receiver<bool>,
    pub(crate) config: AppConfig,
}

/// Builds the router. Flipping `shutdown` to true ends every open /ws stream.
pub fn app(
    collector: Arc<MetricsCollector>,
    runtime: Option<Arc<dyn ContainerRuntime>>,
    active_streams: Arc<AtomicUsize>,
    shutdown: watch::Receiver<bool>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        collector,
        runtime,
        active_streams,
        shutdown,
        config,
    };
    Router::new()
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .route("/ws", get(ws::ws_metrics)) // WS /ws
        .route("/container/action", post(http::container_action_handler)) // POST /container/action
        .route("/health", get(http::health_handler)) // GET /health
        .layer(cors::cors_layer())
        .layer(middleware::from_fn(cors::options_no_content))
        .with_state(state)
}
