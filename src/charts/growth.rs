//! Daily growth rate with its trailing moving average

use serde_json::json;

use super::panel::{precheck, Panel, PanelKind, PanelOutcome};
use super::style;
use super::surface::{ChartSurface, RenderError};
use crate::model::DashboardPayload;
use crate::transform::moving_average;

pub const GROWTH_MOUNT: &str = "growthRateChart";

#[derive(Debug, Clone)]
pub struct GrowthRatePanel {
    window: usize,
}

impl GrowthRatePanel {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for GrowthRatePanel {
    fn default() -> Self {
        Self::new(7)
    }
}

impl Panel for GrowthRatePanel {
    fn kind(&self) -> PanelKind {
        PanelKind::GrowthRate
    }

    fn mount(&self) -> Option<&'static str> {
        Some(GROWTH_MOUNT)
    }

    fn render(
        &self,
        payload: &DashboardPayload,
        surface: &dyn ChartSurface,
    ) -> Result<PanelOutcome, RenderError> {
        let points = &payload.time_trend;
        if let Some(outcome) = precheck(self.kind(), GROWTH_MOUNT, points.len(), surface) {
            return Ok(outcome);
        }

        let dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
        // Days without a rate are plotted as flat
        let rates: Vec<f64> = points
            .iter()
            .map(|p| p.growth_rate_percent.unwrap_or(0.0))
            .collect();
        let rate_values: Vec<Option<f64>> = rates.iter().copied().map(Some).collect();
        let averaged = moving_average(&rate_values, self.window);

        let average_name = format!("{}日移动平均", self.window);

        let mut y_axis = style::named_value_axis("增长率 (%)", style::AXIS_LINE_COLOR, style::SPLIT_LINE_COLOR);
        y_axis["axisLabel"]["formatter"] = json!("{value}%");

        let option = json!({
            "tooltip": { "trigger": "axis" },
            "legend": style::legend(&["日增长率", average_name.as_str()]),
            "grid": style::grid(),
            "xAxis": style::date_axis(&dates),
            "yAxis": y_axis,
            "series": [
                {
                    "name": "日增长率",
                    "type": "line",
                    "data": rates,
                    "lineStyle": { "width": 2, "color": style::RED },
                    "itemStyle": { "color": style::RED }
                },
                {
                    "name": average_name,
                    "type": "line",
                    "data": averaged,
                    "smooth": true,
                    "lineStyle": { "width": 3, "color": style::BLUE },
                    "itemStyle": { "color": style::BLUE }
                }
            ]
        });

        surface.set_option(GROWTH_MOUNT, option)?;
        Ok(PanelOutcome::Rendered)
    }
}
