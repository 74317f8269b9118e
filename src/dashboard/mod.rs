//! Dashboard runner
//!
//! Drives one dashboard load: the data request and the shape request run
//! concurrently and unordered; once the data arrives every panel renders
//! against it. A failed data load raises one alert and marks every chart
//! mount as failed.
//!
//! # Example
//!
//! ```rust,ignore
//! use epidash::charts::SnapshotSurface;
//! use epidash::config::DashboardConfig;
//! use epidash::dashboard::Dashboard;
//!
//! let dashboard = Dashboard::from_config(&DashboardConfig::default())?;
//! let surface = SnapshotSurface::new(dashboard.mounts());
//! let report = dashboard.run(&surface).await;
//! println!("{} panels rendered", report.rendered_count());
//! ```

pub mod loader;
pub mod pipeline;
pub mod shape;

pub use loader::{load_payload, HttpPayloadSource, LoadError, LocalPayloadSource, PayloadSource};
pub use pipeline::{DashboardReport, PanelReport, PanelSet};
pub use shape::{register_shape, FileShapeSource, HttpShapeSource, ShapeSource};

use std::sync::Arc;

use crate::charts::ChartSurface;
use crate::config::{DashboardConfig, SourceConfig};
use crate::source::CaseDataSource;

/// A data source, a shape source and the panels drawn from them
pub struct Dashboard {
    data: Box<dyn PayloadSource>,
    shape: Box<dyn ShapeSource>,
    panels: PanelSet,
    map_name: String,
}

impl Dashboard {
    pub fn new(
        data: Box<dyn PayloadSource>,
        shape: Box<dyn ShapeSource>,
        panels: PanelSet,
        map_name: impl Into<String>,
    ) -> Self {
        Self {
            data,
            shape,
            panels,
            map_name: map_name.into(),
        }
    }

    /// Dashboard talking to a running server over HTTP
    pub fn from_config(config: &DashboardConfig) -> Result<Self, LoadError> {
        Ok(Self::new(
            Box::new(HttpPayloadSource::from_config(config)?),
            Box::new(HttpShapeSource::from_config(config)?),
            PanelSet::standard(config),
            config.map_name.clone(),
        ))
    }

    /// Dashboard reading the case-data and shape files in-process
    pub fn local(
        source: Arc<CaseDataSource>,
        source_config: &SourceConfig,
        config: &DashboardConfig,
    ) -> Self {
        Self::new(
            Box::new(LocalPayloadSource::new(source)),
            Box::new(FileShapeSource::new(source_config.shape_file())),
            PanelSet::standard(config),
            config.map_name.clone(),
        )
    }

    pub fn panels(&self) -> &PanelSet {
        &self.panels
    }

    /// Every mount and element id the panels write to
    pub fn mounts(&self) -> Vec<&'static str> {
        self.panels.all_mounts()
    }

    /// Load data and shape concurrently, then render every panel
    pub async fn run(&self, surface: &dyn ChartSurface) -> DashboardReport {
        self.panels.mark_loading(surface);

        let shape = register_shape(self.shape.as_ref(), surface, &self.map_name);
        let render = async {
            match load_payload(self.data.as_ref()).await {
                Ok(payload) => DashboardReport {
                    panels: self.panels.render(&payload, surface),
                    ..Default::default()
                },
                Err(e) => {
                    let message = e.user_message();
                    tracing::error!(error = %e, "Dashboard load failed");
                    surface.alert(&message);
                    self.panels.fail_all(surface);
                    DashboardReport {
                        error: Some(message),
                        ..Default::default()
                    }
                }
            }
        };

        let (shape_registered, mut report) = tokio::join!(shape, render);
        report.shape_registered = shape_registered;

        tracing::info!(
            rendered = report.rendered_count(),
            panels = report.panels.len(),
            shape_registered,
            failed = report.is_error(),
            "Dashboard run finished"
        );
        report
    }
}
