//! Response types for the API endpoints

use serde::Serialize;

use crate::charts::DashboardSnapshot;
use crate::dashboard::DashboardReport;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", "degraded" or "unhealthy"
    pub status: String,
    /// "ok" or "missing"
    pub data_file: String,
    /// "ok" or "missing"
    pub shape_file: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// `/api/panels` body: what every mount shows, and how each panel went
#[derive(Debug, Serialize)]
pub struct PanelsResponse {
    pub snapshot: DashboardSnapshot,
    pub report: DashboardReport,
}
