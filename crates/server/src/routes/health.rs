use crate::error::{ServerError, ServerResult};
use crate::state::{ServerMetadata, ServerState};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "roster-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Readiness check endpoint
/// Returns 200 once the store answers a read
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let students = state.students.clone();
    tokio::task::spawn_blocking(move || students.store().ping())
        .await
        .map_err(|e| ServerError::Internal(format!("readiness task failed: {e}")))??;

    let metadata = ServerMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Ok(Json(json!({
        "status": "ready",
        "service": "roster-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "server": metadata,
        "components": {
            "api": "ready",
            "store": "ready",
        }
    })))
}
