//! # Epidash
//!
//! Hong Kong epidemic dashboard: a case-data backend and the chart panel
//! pipeline that renders it.
//!
//! ## Features
//!
//! - **Case-data source**: aggregates a per-district CSV export into one payload
//! - **Six panels**: trend, growth rate, district ranking, hotspots, summary and map
//! - **Concurrent loading**: data and map shape are fetched side by side
//! - **Contained failures**: one broken panel never takes down the others
//!
//! ## Modules
//!
//! - [`source`]: CSV reading and aggregation behind `/api/data`
//! - [`schema`]: payload validation at the fetch boundary
//! - [`transform`]: moving average and district classification
//! - [`charts`]: panel option builders and the rendering surface
//! - [`dashboard`]: loaders and the render pipeline
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use epidash::charts::SnapshotSurface;
//! use epidash::config::DashboardConfig;
//! use epidash::dashboard::Dashboard;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dashboard = Dashboard::from_config(&DashboardConfig::default())?;
//!     let surface = SnapshotSurface::new(dashboard.mounts());
//!
//!     let report = dashboard.run(&surface).await;
//!     println!("Rendered {} panels", report.rendered_count());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod model;
pub mod schema;
pub mod source;
pub mod transform;

// Re-export top-level types for convenience
pub use model::{DashboardPayload, DistrictRecord, SeriesPoint, SummaryRecord};

pub use schema::{RawPayload, SchemaError};

pub use transform::{
    moving_average, ClassifiedDistrict, DistrictClassifier, DistrictNameMap, RiskBucket,
    RiskLadder,
};

pub use charts::{
    ChartSurface, DashboardSnapshot, MountState, Panel, PanelKind, PanelOutcome, RenderError,
    SnapshotSurface,
};

pub use dashboard::{Dashboard, DashboardReport, LoadError, PanelSet};

pub use source::{CaseDataSource, SourceError};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, LoggingConfig, SourceConfig};
