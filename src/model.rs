//! Dashboard data model
//!
//! Canonical, validated types shared by the case-data source, the loaders and
//! the panel pipeline:
//! - `SeriesPoint`: one day of the city-wide time series
//! - `DistrictRecord`: one district's counts on the latest reporting date
//! - `SummaryRecord`: headline counters
//! - `DashboardPayload`: the `/api/data` response body
//!
//! Field names serialize in camelCase. Legacy native-language keys are only
//! accepted at the fetch boundary (see [`crate::schema`]).

use serde::{Deserialize, Serialize};

/// Placeholder shown when no reporting date is known
pub const UNKNOWN_DATE: &str = "未知";

/// A single day of the city-wide time series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Reporting date, `%Y-%m-%d`
    pub date: String,
    /// Cases reported on this date
    pub new_cases: u64,
    /// Cumulative confirmed cases as of this date
    pub cumulative_confirmed: u64,
    /// Day-over-day change in new cases, percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate_percent: Option<f64>,
}

impl SeriesPoint {
    pub fn new(date: impl Into<String>, new_cases: u64, cumulative_confirmed: u64) -> Self {
        Self {
            date: date.into(),
            new_cases,
            cumulative_confirmed,
            growth_rate_percent: None,
        }
    }

    /// Builder method: set the growth rate
    pub fn growth_rate(mut self, percent: f64) -> Self {
        self.growth_rate_percent = Some(percent);
        self
    }
}

/// Counts for one district, named in the native language
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRecord {
    pub district_name: String,
    pub confirmed_count: u64,
    pub new_cases: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cured_count: Option<u64>,
}

impl DistrictRecord {
    pub fn new(district_name: impl Into<String>, confirmed_count: u64, new_cases: u64) -> Self {
        Self {
            district_name: district_name.into(),
            confirmed_count,
            new_cases,
            death_count: None,
            cured_count: None,
        }
    }
}

/// Headline counters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub total_confirmed: u64,
    pub new_cases_today: u64,
    pub death_cases: u64,
    pub cured_cases: u64,
    pub latest_date: String,
}

impl Default for SummaryRecord {
    fn default() -> Self {
        Self {
            total_confirmed: 0,
            new_cases_today: 0,
            death_cases: 0,
            cured_cases: 0,
            latest_date: UNKNOWN_DATE.to_string(),
        }
    }
}

/// Body of `GET /api/data`
///
/// When `error` is set the remaining fields are meaningless and every
/// consumer must stop before rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRecord>,
    #[serde(default)]
    pub time_trend: Vec<SeriesPoint>,
    #[serde(default)]
    pub district_data: Vec<DistrictRecord>,
    #[serde(default)]
    pub hotspot_districts: Vec<DistrictRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DashboardPayload {
    /// Payload carrying only an application-level error
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = DashboardPayload {
            summary: Some(SummaryRecord::default()),
            time_trend: vec![SeriesPoint::new("2025-03-20", 12, 340).growth_rate(9.09)],
            district_data: vec![DistrictRecord::new("沙田区", 340, 12)],
            hotspot_districts: vec![],
            error: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["summary"]["latestDate"], "未知");
        assert_eq!(json["timeTrend"][0]["cumulativeConfirmed"], 340);
        assert_eq!(json["timeTrend"][0]["growthRatePercent"], 9.09);
        assert_eq!(json["districtData"][0]["districtName"], "沙田区");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_payload() {
        let payload = DashboardPayload::from_error("boom");
        assert!(payload.is_error());
        assert!(payload.time_trend.is_empty());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["error"], "boom");
    }
}
