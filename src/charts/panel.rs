//! Panel abstraction
//!
//! A panel validates its slice of the payload, reshapes it, builds a chart
//! option and hands it to the surface. Panels are independent: none reads
//! another's output, and one failing never stops the rest.

use serde::Serialize;
use std::fmt;

use super::surface::{ChartSurface, RenderError};
use crate::model::DashboardPayload;

/// The six dashboard panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Trend,
    GrowthRate,
    District,
    Hotspot,
    Summary,
    Map,
}

impl PanelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::Trend => "trend",
            PanelKind::GrowthRate => "growth_rate",
            PanelKind::District => "district",
            PanelKind::Hotspot => "hotspot",
            PanelKind::Summary => "summary",
            PanelKind::Map => "map",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a panel's render went
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelOutcome {
    /// Option handed to the surface
    Rendered,
    /// Option handed over, but a dependency was not ready
    Ineffective { reason: String },
    /// Nothing to draw; no-op
    Skipped { reason: String },
    /// Build or hand-over failed; the mount shows an error marker
    Failed { error: String },
}

impl PanelOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        PanelOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, PanelOutcome::Rendered)
    }
}

/// One dashboard panel
pub trait Panel: Send + Sync {
    fn kind(&self) -> PanelKind;

    /// Chart mount point, if the panel draws a chart
    fn mount(&self) -> Option<&'static str>;

    /// Render from the payload onto the surface
    fn render(
        &self,
        payload: &DashboardPayload,
        surface: &dyn ChartSurface,
    ) -> Result<PanelOutcome, RenderError>;
}

/// Common guard for chart panels: an empty slice or a missing mount is a
/// logged no-op
pub(crate) fn precheck(
    kind: PanelKind,
    mount: &str,
    len: usize,
    surface: &dyn ChartSurface,
) -> Option<PanelOutcome> {
    if len == 0 {
        tracing::warn!(panel = %kind, "Panel input is empty, skipping");
        return Some(PanelOutcome::skipped("input is empty"));
    }

    if !surface.has_mount(mount) {
        tracing::warn!(panel = %kind, mount, "Mount point not found, skipping");
        return Some(PanelOutcome::skipped(format!("mount '{}' not found", mount)));
    }

    tracing::debug!(panel = %kind, points = len, "Rendering panel");
    None
}
