//! District ranking by confirmed cases

use serde_json::{json, Value};

use super::panel::{precheck, Panel, PanelKind, PanelOutcome};
use super::style;
use super::surface::{ChartSurface, RenderError};
use crate::model::{DashboardPayload, DistrictRecord};

pub const DISTRICT_MOUNT: &str = "districtChart";

#[derive(Debug, Clone)]
pub struct DistrictRankingPanel {
    top_n: usize,
}

impl DistrictRankingPanel {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for DistrictRankingPanel {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Districts with the most confirmed cases, highest first
pub fn top_districts(records: &[DistrictRecord], n: usize) -> Vec<&DistrictRecord> {
    let mut sorted: Vec<&DistrictRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.confirmed_count.cmp(&a.confirmed_count));
    sorted.truncate(n);
    sorted
}

/// Bar fill whose bright stop moves with the bar's share of the maximum
fn bar_fill(value: u64, max: u64) -> Value {
    let ratio = if max > 0 {
        value as f64 / max as f64
    } else {
        0.0
    };
    style::linear_gradient(
        1.0,
        0.0,
        &[(0.0, "#83bff6"), (ratio, "#188df0"), (1.0, "#188df0")],
    )
}

impl Panel for DistrictRankingPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::District
    }

    fn mount(&self) -> Option<&'static str> {
        Some(DISTRICT_MOUNT)
    }

    fn render(
        &self,
        payload: &DashboardPayload,
        surface: &dyn ChartSurface,
    ) -> Result<PanelOutcome, RenderError> {
        let records = &payload.district_data;
        if let Some(outcome) = precheck(self.kind(), DISTRICT_MOUNT, records.len(), surface) {
            return Ok(outcome);
        }

        let top = top_districts(records, self.top_n);
        let names: Vec<&str> = top.iter().map(|d| d.district_name.as_str()).collect();
        let max = top.first().map(|d| d.confirmed_count).unwrap_or(0);

        let data: Vec<Value> = top
            .iter()
            .map(|d| {
                json!({
                    "value": d.confirmed_count,
                    "itemStyle": { "color": bar_fill(d.confirmed_count, max) }
                })
            })
            .collect();

        let option = json!({
            "tooltip": style::axis_tooltip("shadow"),
            "grid": style::grid(),
            "xAxis": style::value_axis(),
            "yAxis": style::name_axis(&names),
            "series": [
                {
                    "name": "确诊病例",
                    "type": "bar",
                    "data": data,
                    "label": { "show": true, "position": "right", "color": style::LEGEND_TEXT_COLOR }
                }
            ]
        });

        surface.set_option(DISTRICT_MOUNT, option)?;
        Ok(PanelOutcome::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::SnapshotSurface;

    fn districts(counts: &[(&str, u64)]) -> Vec<DistrictRecord> {
        counts
            .iter()
            .map(|(name, confirmed)| DistrictRecord::new(*name, *confirmed, 0))
            .collect()
    }

    #[test]
    fn test_top_districts() {
        let records = districts(&[("a", 5), ("b", 50), ("c", 20), ("d", 50)]);
        let top: Vec<&str> = top_districts(&records, 3)
            .iter()
            .map(|d| d.district_name.as_str())
            .collect();

        assert_eq!(top, vec!["b", "d", "c"]);
    }

    #[test]
    fn test_ranking_option() {
        let payload = DashboardPayload {
            district_data: districts(&[("东区", 200), ("北区", 800), ("南区", 400)]),
            ..Default::default()
        };
        let surface = SnapshotSurface::new([DISTRICT_MOUNT]);

        let outcome = DistrictRankingPanel::new(2)
            .render(&payload, &surface)
            .unwrap();
        assert!(outcome.is_rendered());

        let snapshot = surface.snapshot();
        let option = snapshot.option(DISTRICT_MOUNT).unwrap();
        assert_eq!(option["yAxis"]["data"], json!(["北区", "南区"]));

        let bars = option["series"][0]["data"].as_array().unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0]["value"], 800);
        assert_eq!(bars[0]["itemStyle"]["color"]["colorStops"][1]["offset"], 1.0);
        assert_eq!(bars[1]["itemStyle"]["color"]["colorStops"][1]["offset"], 0.5);
    }

    #[test]
    fn test_all_zero_counts() {
        let fill = bar_fill(0, 0);
        assert_eq!(fill["colorStops"][1]["offset"], 0.0);
    }
}
