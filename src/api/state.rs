//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::source::CaseDataSource;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Case-data file, re-read on every request
    pub source: Arc<CaseDataSource>,
    /// In-process dashboard backing `/api/panels`
    pub dashboard: Arc<Dashboard>,
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let source = Arc::new(CaseDataSource::from_config(&config.source));
        let dashboard = Dashboard::local(Arc::clone(&source), &config.source, &config.dashboard);

        Self {
            source,
            dashboard: Arc::new(dashboard),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn shape_available(&self) -> bool {
        self.config.source.shape_file().is_file()
    }
}
