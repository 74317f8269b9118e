//! Hotspot districts: confirmed and new cases stacked

use serde_json::json;

use super::panel::{precheck, Panel, PanelKind, PanelOutcome};
use super::style;
use super::surface::{ChartSurface, RenderError};
use crate::model::DashboardPayload;

pub const HOTSPOT_MOUNT: &str = "hotspotChart";

#[derive(Debug, Clone, Default)]
pub struct HotspotPanel;

impl Panel for HotspotPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Hotspot
    }

    fn mount(&self) -> Option<&'static str> {
        Some(HOTSPOT_MOUNT)
    }

    fn render(
        &self,
        payload: &DashboardPayload,
        surface: &dyn ChartSurface,
    ) -> Result<PanelOutcome, RenderError> {
        let records = &payload.hotspot_districts;
        if let Some(outcome) = precheck(self.kind(), HOTSPOT_MOUNT, records.len(), surface) {
            return Ok(outcome);
        }

        let names: Vec<&str> = records.iter().map(|d| d.district_name.as_str()).collect();
        let confirmed: Vec<u64> = records.iter().map(|d| d.confirmed_count).collect();
        let new_cases: Vec<u64> = records.iter().map(|d| d.new_cases).collect();

        let option = json!({
            "tooltip": style::axis_tooltip("shadow"),
            "legend": style::legend(&["累计确诊", "新增病例"]),
            "grid": style::grid(),
            "xAxis": style::value_axis(),
            "yAxis": style::name_axis(&names),
            "series": [
                {
                    "name": "累计确诊",
                    "type": "bar",
                    "stack": "总量",
                    "data": confirmed,
                    "itemStyle": { "color": style::BLUE }
                },
                {
                    "name": "新增病例",
                    "type": "bar",
                    "stack": "总量",
                    "data": new_cases,
                    "itemStyle": { "color": style::RED }
                }
            ]
        });

        surface.set_option(HOTSPOT_MOUNT, option)?;
        Ok(PanelOutcome::Rendered)
    }
}
