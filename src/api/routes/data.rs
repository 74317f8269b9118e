//! Data Routes
//!
//! - GET /api/data - Aggregated case data
//! - GET /api/panels - Every panel rendered server-side against the same data

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::PanelsResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::charts::SnapshotSurface;
use crate::model::DashboardPayload;

/// GET /api/data
///
/// Source failures come back as 200 with the `error` field set.
pub async fn get_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardPayload>> {
    let source = Arc::clone(&state.source);
    let payload = tokio::task::spawn_blocking(move || source.build_payload())
        .await
        .map_err(|e| ApiError::Internal(format!("Data worker failed: {}", e)))?;

    tracing::debug!(
        days = payload.time_trend.len(),
        districts = payload.district_data.len(),
        error = payload.error.as_deref(),
        "Serving dashboard payload"
    );

    Ok(Json(payload))
}

/// GET /api/panels
pub async fn get_panels(State(state): State<Arc<AppState>>) -> Json<PanelsResponse> {
    let surface = SnapshotSurface::new(state.dashboard.mounts());
    let report = state.dashboard.run(&surface).await;

    Json(PanelsResponse {
        snapshot: surface.into_snapshot(),
        report,
    })
}
