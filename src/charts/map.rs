//! District choropleth
//!
//! Data items are named in the shape resource's convention so the chart
//! library can match them to regions; each item also carries the native name
//! and risk label, used for its label and tooltip.

use serde_json::{json, Value};

use super::panel::{precheck, Panel, PanelKind, PanelOutcome};
use super::style;
use super::surface::{ChartSurface, RenderError};
use crate::model::DashboardPayload;
use crate::transform::{ClassifiedDistrict, DistrictClassifier};

pub const MAP_MOUNT: &str = "mapChart";

/// visualMap ceiling when every district reports zero
const DEFAULT_VISUAL_MAX: u64 = 5000;

#[derive(Debug, Clone)]
pub struct MapPanel {
    classifier: DistrictClassifier,
    map_name: String,
}

impl MapPanel {
    pub fn new(classifier: DistrictClassifier, map_name: impl Into<String>) -> Self {
        Self {
            classifier,
            map_name: map_name.into(),
        }
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }
}

impl Default for MapPanel {
    fn default() -> Self {
        Self::new(DistrictClassifier::default(), "HK")
    }
}

fn tooltip_text(district: &ClassifiedDistrict) -> String {
    format!(
        "{}<br/>确诊病例: {}<br/>风险等级: {}",
        district.native_name, district.confirmed, district.risk
    )
}

fn map_item(district: &ClassifiedDistrict) -> Value {
    json!({
        "name": district.name,
        "value": district.confirmed,
        "nativeName": district.native_name,
        "riskLevel": district.risk.label(),
        "label": { "formatter": district.native_name },
        "tooltip": { "formatter": tooltip_text(district) }
    })
}

impl Panel for MapPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Map
    }

    fn mount(&self) -> Option<&'static str> {
        Some(MAP_MOUNT)
    }

    fn render(
        &self,
        payload: &DashboardPayload,
        surface: &dyn ChartSurface,
    ) -> Result<PanelOutcome, RenderError> {
        let records = &payload.district_data;
        if let Some(outcome) = precheck(self.kind(), MAP_MOUNT, records.len(), surface) {
            return Ok(outcome);
        }

        let districts = self.classifier.classify_all(records);
        tracing::debug!(
            sample = ?districts.iter().take(5).map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "Classified districts"
        );

        let max = districts.iter().map(|d| d.confirmed).max().unwrap_or(0);
        let visual_max = if max == 0 { DEFAULT_VISUAL_MAX } else { max };
        let data: Vec<Value> = districts.iter().map(map_item).collect();

        let option = json!({
            "backgroundColor": "#12274a",
            "title": {
                "text": "香港各区疫情分布",
                "subtext": "确诊病例数和风险等级",
                "left": "center",
                "textStyle": { "color": style::LEGEND_TEXT_COLOR },
                "subtextStyle": { "color": "#ccc" }
            },
            "tooltip": { "trigger": "item" },
            "visualMap": {
                "min": 0,
                "max": visual_max,
                "left": "left",
                "top": "bottom",
                "text": ["高", "低"],
                "calculable": true,
                "inRange": { "color": ["#50a3ba", "#eac736", "#d94e5d", "#7f1818"] },
                "textStyle": { "color": style::LEGEND_TEXT_COLOR }
            },
            "series": [
                {
                    "name": "香港各区确诊病例",
                    "type": "map",
                    "map": self.map_name,
                    "roam": true,
                    "nameProperty": "name",
                    "data": data,
                    "itemStyle": {
                        "areaColor": "#0d1d43",
                        "borderColor": "#3fdaff",
                        "borderWidth": 1
                    },
                    "emphasis": {
                        "label": { "show": true },
                        "itemStyle": { "areaColor": "#a39eae" }
                    },
                    "label": { "show": true, "color": "white", "fontSize": 9 }
                }
            ]
        });

        surface.set_option(MAP_MOUNT, option)?;

        if !surface.has_map(&self.map_name) {
            tracing::warn!(map = %self.map_name, "Shape not registered yet, map render is ineffective");
            return Ok(PanelOutcome::Ineffective {
                reason: format!("shape '{}' not registered", self.map_name),
            });
        }

        Ok(PanelOutcome::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::SnapshotSurface;
    use crate::model::DistrictRecord;

    fn payload(records: Vec<DistrictRecord>) -> DashboardPayload {
        DashboardPayload {
            district_data: records,
            ..Default::default()
        }
    }

    fn registered_surface() -> SnapshotSurface {
        let surface = SnapshotSurface::new([MAP_MOUNT]);
        surface
            .register_map("HK", json!({"type": "FeatureCollection", "features": []}))
            .unwrap();
        surface
    }

    #[test]
    fn test_map_items() {
        let surface = registered_surface();
        let outcome = MapPanel::default()
            .render(
                &payload(vec![
                    DistrictRecord::new("湾仔区", 5001, 3),
                    DistrictRecord::new("离岛区", 20, 0),
                ]),
                &surface,
            )
            .unwrap();
        assert!(outcome.is_rendered());

        let snapshot = surface.snapshot();
        let option = snapshot.option(MAP_MOUNT).unwrap();
        let item = &option["series"][0]["data"][0];

        assert_eq!(item["name"], "Wan Chai");
        assert_eq!(item["nativeName"], "湾仔区");
        assert_eq!(item["riskLevel"], "高风险");
        assert_eq!(item["label"]["formatter"], "湾仔区");
        assert_eq!(
            item["tooltip"]["formatter"],
            "湾仔区<br/>确诊病例: 5001<br/>风险等级: 高风险"
        );
        assert_eq!(option["series"][0]["data"][1]["riskLevel"], "极低风险");
        assert_eq!(option["visualMap"]["max"], 5001);
        assert_eq!(option["series"][0]["map"], "HK");
    }

    #[test]
    fn test_zero_counts_use_default_ceiling() {
        let surface = registered_surface();
        MapPanel::default()
            .render(&payload(vec![DistrictRecord::new("北区", 0, 0)]), &surface)
            .unwrap();

        let snapshot = surface.snapshot();
        assert_eq!(snapshot.option(MAP_MOUNT).unwrap()["visualMap"]["max"], 5000);
    }

    #[test]
    fn test_unregistered_shape_is_ineffective() {
        let surface = SnapshotSurface::new([MAP_MOUNT]);
        let outcome = MapPanel::default()
            .render(&payload(vec![DistrictRecord::new("北区", 10, 0)]), &surface)
            .unwrap();

        assert!(matches!(outcome, PanelOutcome::Ineffective { .. }));
        assert!(surface.snapshot().option(MAP_MOUNT).is_some());
    }

    #[test]
    fn test_empty_districts_skip() {
        let surface = registered_surface();
        let outcome = MapPanel::default()
            .render(&payload(vec![]), &surface)
            .unwrap();
        assert!(matches!(outcome, PanelOutcome::Skipped { .. }));
    }
}
