//! Daily new cases and cumulative confirmed

use serde_json::json;

use super::panel::{precheck, Panel, PanelKind, PanelOutcome};
use super::style;
use super::surface::{ChartSurface, RenderError};
use crate::model::DashboardPayload;

pub const TREND_MOUNT: &str = "trendChart";

#[derive(Debug, Clone, Default)]
pub struct TrendPanel;

impl Panel for TrendPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Trend
    }

    fn mount(&self) -> Option<&'static str> {
        Some(TREND_MOUNT)
    }

    fn render(
        &self,
        payload: &DashboardPayload,
        surface: &dyn ChartSurface,
    ) -> Result<PanelOutcome, RenderError> {
        let points = &payload.time_trend;
        if let Some(outcome) = precheck(self.kind(), TREND_MOUNT, points.len(), surface) {
            return Ok(outcome);
        }

        let dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
        let new_cases: Vec<u64> = points.iter().map(|p| p.new_cases).collect();
        let confirmed: Vec<u64> = points.iter().map(|p| p.cumulative_confirmed).collect();

        let option = json!({
            "tooltip": style::axis_tooltip("cross"),
            "legend": style::legend(&["每日新增", "累计确诊"]),
            "grid": style::grid(),
            "xAxis": style::date_axis(&dates),
            "yAxis": [
                style::named_value_axis("新增病例", style::AXIS_LINE_COLOR, style::SPLIT_LINE_COLOR),
                style::named_value_axis("累计确诊", style::GREEN, "rgba(145, 204, 117, 0.2)")
            ],
            "series": [
                {
                    "name": "每日新增",
                    "type": "bar",
                    "data": new_cases,
                    "itemStyle": {
                        "color": style::linear_gradient(0.0, 1.0, &[(0.0, "#aa4b6b"), (1.0, "#6b6b83")])
                    }
                },
                {
                    "name": "累计确诊",
                    "type": "line",
                    "yAxisIndex": 1,
                    "data": confirmed,
                    "symbol": "circle",
                    "symbolSize": 8,
                    "lineStyle": { "width": 3, "color": style::GREEN },
                    "itemStyle": { "color": style::GREEN }
                }
            ]
        });

        surface.set_option(TREND_MOUNT, option)?;
        Ok(PanelOutcome::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::SnapshotSurface;
    use crate::model::SeriesPoint;

    #[test]
    fn test_trend_option() {
        let payload = DashboardPayload {
            time_trend: vec![
                SeriesPoint::new("2025-03-22", 3, 100),
                SeriesPoint::new("2025-03-23", 5, 105),
            ],
            ..Default::default()
        };
        let surface = SnapshotSurface::new([TREND_MOUNT]);

        let outcome = TrendPanel.render(&payload, &surface).unwrap();
        assert!(outcome.is_rendered());

        let snapshot = surface.snapshot();
        let option = snapshot.option(TREND_MOUNT).unwrap();
        assert_eq!(option["xAxis"]["data"][0], "2025-03-22");
        assert_eq!(option["series"][0]["data"], json!([3, 5]));
        assert_eq!(option["series"][1]["data"], json!([100, 105]));
        assert_eq!(option["series"][1]["yAxisIndex"], 1);
    }

    #[test]
    fn test_empty_series_skips() {
        let surface = SnapshotSurface::new([TREND_MOUNT]);
        let outcome = TrendPanel
            .render(&DashboardPayload::default(), &surface)
            .unwrap();

        assert!(matches!(outcome, PanelOutcome::Skipped { .. }));
        assert!(surface.snapshot().option(TREND_MOUNT).is_none());
    }

    #[test]
    fn test_missing_mount_skips() {
        let payload = DashboardPayload {
            time_trend: vec![SeriesPoint::new("2025-03-23", 5, 105)],
            ..Default::default()
        };
        let surface = SnapshotSurface::new(["somethingElse"]);

        let outcome = TrendPanel.render(&payload, &surface).unwrap();
        assert!(matches!(outcome, PanelOutcome::Skipped { .. }));
    }
}
