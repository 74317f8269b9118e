//! Chart panels
//!
//! Each panel turns one slice of the [`DashboardPayload`](crate::model::DashboardPayload)
//! into a declarative chart option and hands it to a [`ChartSurface`].
//!
//! - [`trend`]: daily new cases and cumulative confirmed
//! - [`growth`]: growth rate with moving average
//! - [`ranking`]: top districts by confirmed cases
//! - [`hotspot`]: stacked hotspot bars
//! - [`summary`]: headline counters
//! - [`map`]: district choropleth

pub mod growth;
pub mod hotspot;
pub mod map;
pub mod panel;
pub mod ranking;
pub mod style;
pub mod summary;
pub mod surface;
pub mod trend;

pub use growth::{GrowthRatePanel, GROWTH_MOUNT};
pub use hotspot::{HotspotPanel, HOTSPOT_MOUNT};
pub use map::{MapPanel, MAP_MOUNT};
pub use panel::{Panel, PanelKind, PanelOutcome};
pub use ranking::{top_districts, DistrictRankingPanel, DISTRICT_MOUNT};
pub use summary::{SummaryPanel, SUMMARY_ELEMENTS};
pub use surface::{
    ChartSurface, DashboardSnapshot, MountState, RenderError, SnapshotSurface, LOADING_TEXT,
    LOAD_FAILED_TEXT,
};
pub use trend::{TrendPanel, TREND_MOUNT};
