// GET /metrics, POST /container/action, GET /health

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use std::time::Duration;

use super::AppState;
use crate::error::ApiError;
use crate::models::{ContainerAction, ContainerActionRequest, SystemMetrics};

/// GET /metrics — one fresh snapshot, collected synchronously.
pub(super) async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<Json<SystemMetrics>, ApiError> {
    let metrics = state.collector.collect().await.map_err(|e| {
        tracing::error!(error = %e, operation = "collect", "snapshot collection failed");
        ApiError::Collection(e.to_string())
    })?;
    Ok(Json(metrics))
}

/// POST /container/action — start, stop or restart one container.
pub(super) async fn container_action_handler(
    State(state): State<AppState>,
    payload: Result<Json<ContainerActionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let action: ContainerAction = req.action.parse()?;
    let runtime = state.runtime.as_ref().ok_or(ApiError::RuntimeUnavailable)?;
    let grace = Duration::from_secs(state.config.containers.stop_timeout_secs);

    let id = req.container_id.as_str();
    let result = match action {
        ContainerAction::Start => runtime.start(id).await,
        ContainerAction::Stop => runtime.stop(id, grace).await,
        ContainerAction::Restart => runtime.restart(id, grace).await,
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, container_id = id, %action, "container action failed");
        return Err(ApiError::Runtime(e.to_string()));
    }

    tracing::info!(container_id = id, %action, "container action applied");
    Ok(Json(json!({ "status": "success" })))
}

/// GET /health — liveness probe.
pub(super) async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
