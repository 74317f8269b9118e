//! Transform-and-render pipeline
//!
//! Runs every panel against the same payload. Each panel sits behind its own
//! error boundary: a failed build marks that panel's mount and the rest carry
//! on.

use serde::Serialize;

use crate::charts::{
    ChartSurface, DistrictRankingPanel, GrowthRatePanel, HotspotPanel, MapPanel, Panel,
    PanelKind, PanelOutcome, SummaryPanel, TrendPanel, LOAD_FAILED_TEXT, SUMMARY_ELEMENTS,
};
use crate::config::DashboardConfig;
use crate::model::DashboardPayload;
use crate::transform::DistrictClassifier;

/// Outcome of one panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelReport {
    pub kind: PanelKind,
    pub outcome: PanelOutcome,
}

/// Outcome of a whole dashboard run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub panels: Vec<PanelReport>,
    /// Set when the payload could not be loaded; no panel ran
    pub error: Option<String>,
    pub shape_registered: bool,
}

impl DashboardReport {
    pub fn outcome(&self, kind: PanelKind) -> Option<&PanelOutcome> {
        self.panels
            .iter()
            .find(|report| report.kind == kind)
            .map(|report| &report.outcome)
    }

    pub fn rendered_count(&self) -> usize {
        self.panels
            .iter()
            .filter(|report| report.outcome.is_rendered())
            .count()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Ordered set of panels run against each payload
pub struct PanelSet {
    panels: Vec<Box<dyn Panel>>,
}

impl PanelSet {
    pub fn new(panels: Vec<Box<dyn Panel>>) -> Self {
        Self { panels }
    }

    /// The six dashboard panels, tuned from config
    pub fn standard(config: &DashboardConfig) -> Self {
        Self::new(vec![
            Box::new(TrendPanel),
            Box::new(GrowthRatePanel::new(config.moving_average_window)),
            Box::new(DistrictRankingPanel::new(config.district_top_n)),
            Box::new(HotspotPanel),
            Box::new(SummaryPanel),
            Box::new(MapPanel::new(
                DistrictClassifier::default(),
                config.map_name.clone(),
            )),
        ])
    }

    pub fn panels(&self) -> &[Box<dyn Panel>] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Chart mount points, in panel order
    pub fn chart_mounts(&self) -> Vec<&'static str> {
        self.panels.iter().filter_map(|panel| panel.mount()).collect()
    }

    /// Chart mounts plus the summary text elements
    pub fn all_mounts(&self) -> Vec<&'static str> {
        let mut mounts = self.chart_mounts();
        if self.panels.iter().any(|p| p.kind() == PanelKind::Summary) {
            mounts.extend(SUMMARY_ELEMENTS);
        }
        mounts
    }

    pub fn mark_loading(&self, surface: &dyn ChartSurface) {
        for mount in self.chart_mounts() {
            surface.show_loading(mount);
        }
    }

    /// Put the load-failure marker on every chart mount
    pub fn fail_all(&self, surface: &dyn ChartSurface) {
        for mount in self.chart_mounts() {
            surface.show_error(mount, LOAD_FAILED_TEXT);
        }
    }

    /// Render every panel; none depends on another's result
    pub fn render(&self, payload: &DashboardPayload, surface: &dyn ChartSurface) -> Vec<PanelReport> {
        self.panels
            .iter()
            .map(|panel| PanelReport {
                kind: panel.kind(),
                outcome: render_guarded(panel.as_ref(), payload, surface),
            })
            .collect()
    }
}

/// Marker on a chart mount whose build failed
pub const CHART_RENDER_FAILED_TEXT: &str = "图表渲染失败";
/// Marker prefix on the map mount; the error text follows
pub const MAP_RENDER_FAILED_TEXT: &str = "地图渲染失败";

fn render_guarded(
    panel: &dyn Panel,
    payload: &DashboardPayload,
    surface: &dyn ChartSurface,
) -> PanelOutcome {
    match panel.render(payload, surface) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(panel = %panel.kind(), error = %e, "Panel render failed");

            if let Some(mount) = panel.mount() {
                let message = match panel.kind() {
                    PanelKind::Map => format!("{}: {}", MAP_RENDER_FAILED_TEXT, e),
                    _ => CHART_RENDER_FAILED_TEXT.to_string(),
                };
                surface.show_error(mount, &message);
            }

            PanelOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{MountState, RenderError, SnapshotSurface, TREND_MOUNT};
    use crate::model::SeriesPoint;

    struct BrokenPanel(PanelKind, &'static str);

    impl Panel for BrokenPanel {
        fn kind(&self) -> PanelKind {
            self.0
        }

        fn mount(&self) -> Option<&'static str> {
            Some(self.1)
        }

        fn render(
            &self,
            _payload: &DashboardPayload,
            _surface: &dyn ChartSurface,
        ) -> Result<PanelOutcome, RenderError> {
            Err(RenderError::InvalidOption("boom".to_string()))
        }
    }

    fn trend_payload() -> DashboardPayload {
        DashboardPayload {
            time_trend: vec![SeriesPoint::new("2025-03-01", 3, 3)],
            ..Default::default()
        }
    }

    #[test]
    fn test_standard_mounts() {
        let panels = PanelSet::standard(&DashboardConfig::default());
        assert_eq!(panels.len(), 6);
        assert_eq!(
            panels.chart_mounts(),
            vec!["trendChart", "growthRateChart", "districtChart", "hotspotChart", "mapChart"]
        );
        assert_eq!(panels.all_mounts().len(), 10);
    }

    #[test]
    fn test_failed_panel_is_contained() {
        let panels = PanelSet::new(vec![
            Box::new(BrokenPanel(PanelKind::Map, "mapChart")),
            Box::new(TrendPanel),
        ]);
        let surface = SnapshotSurface::new(panels.all_mounts());

        let reports = panels.render(&trend_payload(), &surface);
        assert!(matches!(reports[0].outcome, PanelOutcome::Failed { .. }));
        assert!(reports[1].outcome.is_rendered());

        let snapshot = surface.snapshot();
        match snapshot.mount("mapChart") {
            Some(MountState::Failed { message }) => {
                assert!(message.starts_with("地图渲染失败: "));
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected mount state: {other:?}"),
        }
        assert!(snapshot.option(TREND_MOUNT).is_some());
    }

    #[test]
    fn test_failed_chart_marker_has_no_detail() {
        let panels = PanelSet::new(vec![
            Box::new(BrokenPanel(PanelKind::Hotspot, "hotspotChart")),
            Box::new(TrendPanel),
        ]);
        let surface = SnapshotSurface::new(panels.all_mounts());

        let reports = panels.render(&trend_payload(), &surface);
        match &reports[0].outcome {
            PanelOutcome::Failed { error } => assert!(error.contains("boom")),
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(
            surface.snapshot().mount("hotspotChart"),
            Some(&MountState::Failed {
                message: CHART_RENDER_FAILED_TEXT.to_string()
            })
        );
    }

    #[test]
    fn test_loading_and_failure_markers() {
        let panels = PanelSet::standard(&DashboardConfig::default());
        let surface = SnapshotSurface::new(panels.all_mounts());

        panels.mark_loading(&surface);
        assert!(matches!(
            surface.snapshot().mount(TREND_MOUNT),
            Some(MountState::Loading { .. })
        ));

        panels.fail_all(&surface);
        let snapshot = surface.snapshot();
        for mount in panels.chart_mounts() {
            assert_eq!(
                snapshot.mount(mount),
                Some(&MountState::Failed {
                    message: LOAD_FAILED_TEXT.to_string()
                })
            );
        }
        assert_eq!(snapshot.mount("totalConfirmed"), Some(&MountState::Empty));
    }
}
