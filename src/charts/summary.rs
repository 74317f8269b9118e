//! Headline counters

use super::panel::{Panel, PanelKind, PanelOutcome};
use super::surface::{ChartSurface, RenderError};
use crate::model::DashboardPayload;

pub const TOTAL_CONFIRMED_ID: &str = "totalConfirmed";
pub const NEW_CASES_TODAY_ID: &str = "newCasesToday";
pub const DEATH_CASES_ID: &str = "deathCases";
pub const CURED_CASES_ID: &str = "curedCases";
pub const UPDATE_TIME_ID: &str = "updateTime";

/// Element ids the summary writes to
pub const SUMMARY_ELEMENTS: [&str; 5] = [
    TOTAL_CONFIRMED_ID,
    NEW_CASES_TODAY_ID,
    DEATH_CASES_ID,
    CURED_CASES_ID,
    UPDATE_TIME_ID,
];

#[derive(Debug, Clone, Default)]
pub struct SummaryPanel;

impl Panel for SummaryPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Summary
    }

    fn mount(&self) -> Option<&'static str> {
        None
    }

    fn render(
        &self,
        payload: &DashboardPayload,
        surface: &dyn ChartSurface,
    ) -> Result<PanelOutcome, RenderError> {
        let Some(summary) = &payload.summary else {
            tracing::warn!(panel = %self.kind(), "Summary is missing, skipping");
            return Ok(PanelOutcome::skipped("summary is missing"));
        };

        let values = [
            (TOTAL_CONFIRMED_ID, summary.total_confirmed.to_string()),
            (NEW_CASES_TODAY_ID, summary.new_cases_today.to_string()),
            (DEATH_CASES_ID, summary.death_cases.to_string()),
            (CURED_CASES_ID, summary.cured_cases.to_string()),
            (UPDATE_TIME_ID, summary.latest_date.clone()),
        ];

        for (id, text) in &values {
            surface.set_text(id, text)?;
        }

        Ok(PanelOutcome::Rendered)
    }
}
