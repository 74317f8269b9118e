//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (case data is readable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the case-data file exists.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.source.exists() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details. Always 200.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let data_ok = state.source.exists();
    let shape_ok = state.shape_available();

    let overall_status = match (data_ok, shape_ok) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        _ => "unhealthy",
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        data_file: component_status(data_ok),
        shape_file: component_status(shape_ok),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn component_status(ok: bool) -> String {
    if ok { "ok" } else { "missing" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
