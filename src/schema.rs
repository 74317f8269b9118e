//! Payload schema validation
//!
//! Normalizes a raw `/api/data` body into the canonical [`DashboardPayload`].
//! Older backends emit native-language keys (`日期`, `地区`, `确诊数`, ...);
//! they are accepted here and nowhere else, so downstream code only ever sees
//! canonical field names. When a record carries both spellings the canonical
//! key wins.
//!
//! Each slice is validated on its own. A slice with a bad record is dropped
//! (the summary becomes `None`) and the rest of the payload is kept, so only
//! the panels reading that slice go without data.

use serde::Deserialize;
use thiserror::Error;

use crate::model::{DashboardPayload, DistrictRecord, SeriesPoint, SummaryRecord, UNKNOWN_DATE};

/// Schema violations found while normalizing a payload
#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    /// A required field is absent
    #[error("{record}[{index}] is missing field '{field}'")]
    MissingField {
        record: &'static str,
        index: usize,
        field: &'static str,
    },

    /// A count is negative, fractional beyond rounding, or not finite
    #[error("{record}[{index}].{field} is not a non-negative count: {value}")]
    InvalidCount {
        record: &'static str,
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Raw `/api/data` body, as loosely typed as the wire allows
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPayload {
    #[serde(default)]
    pub summary: Option<RawSummary>,
    #[serde(default)]
    pub time_trend: Option<Vec<RawSeriesPoint>>,
    #[serde(default)]
    pub district_data: Option<Vec<RawDistrict>>,
    #[serde(default)]
    pub hotspot_districts: Option<Vec<RawDistrict>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSummary {
    pub total_confirmed: Option<f64>,
    pub new_cases_today: Option<f64>,
    pub death_cases: Option<f64>,
    pub cured_cases: Option<f64>,
    pub latest_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSeriesPoint {
    pub date: Option<String>,
    #[serde(rename = "newCases")]
    pub new_cases: Option<f64>,
    #[serde(rename = "cumulativeConfirmed")]
    pub cumulative_confirmed: Option<f64>,
    #[serde(rename = "growthRatePercent")]
    pub growth_rate_percent: Option<f64>,

    #[serde(rename = "日期")]
    pub legacy_date: Option<String>,
    #[serde(rename = "新增病例")]
    pub legacy_new_cases: Option<f64>,
    #[serde(rename = "确诊数")]
    pub legacy_cumulative_confirmed: Option<f64>,
    #[serde(rename = "增长率")]
    pub legacy_growth_rate_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDistrict {
    #[serde(rename = "districtName")]
    pub district_name: Option<String>,
    #[serde(rename = "confirmedCount")]
    pub confirmed_count: Option<f64>,
    #[serde(rename = "newCases")]
    pub new_cases: Option<f64>,
    #[serde(rename = "deathCount")]
    pub death_count: Option<f64>,
    #[serde(rename = "curedCount")]
    pub cured_count: Option<f64>,

    #[serde(rename = "地区")]
    pub legacy_district_name: Option<String>,
    #[serde(rename = "确诊数")]
    pub legacy_confirmed_count: Option<f64>,
    #[serde(rename = "新增病例")]
    pub legacy_new_cases: Option<f64>,
    #[serde(rename = "死亡数")]
    pub legacy_death_count: Option<f64>,
    #[serde(rename = "康复数")]
    pub legacy_cured_count: Option<f64>,
}

impl RawPayload {
    /// Convert into the canonical payload, dropping any slice that fails
    /// validation
    ///
    /// An embedded `error` is carried through untouched; the caller decides
    /// whether to short-circuit on it.
    pub fn normalize(self) -> DashboardPayload {
        if let Some(error) = self.error {
            return DashboardPayload::from_error(error);
        }

        let summary = self
            .summary
            .and_then(|summary| keep_valid(summary.normalize()));

        let time_trend = keep_valid(normalize_series(self.time_trend)).unwrap_or_default();
        let district_data =
            keep_valid(normalize_districts("districtData", self.district_data)).unwrap_or_default();
        let hotspot_districts =
            keep_valid(normalize_districts("hotspotDistricts", self.hotspot_districts))
                .unwrap_or_default();

        DashboardPayload {
            summary,
            time_trend,
            district_data,
            hotspot_districts,
            error: None,
        }
    }
}

fn keep_valid<T>(result: Result<T, SchemaError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping invalid payload slice");
            None
        }
    }
}

impl RawSummary {
    fn normalize(self) -> Result<SummaryRecord, SchemaError> {
        let count = |value: Option<f64>, field| optional_count("summary", 0, field, value);

        Ok(SummaryRecord {
            total_confirmed: count(self.total_confirmed, "totalConfirmed")?.unwrap_or(0),
            new_cases_today: count(self.new_cases_today, "newCasesToday")?.unwrap_or(0),
            death_cases: count(self.death_cases, "deathCases")?.unwrap_or(0),
            cured_cases: count(self.cured_cases, "curedCases")?.unwrap_or(0),
            latest_date: self
                .latest_date
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        })
    }
}

impl RawSeriesPoint {
    fn normalize(self, index: usize) -> Result<SeriesPoint, SchemaError> {
        const RECORD: &str = "timeTrend";

        let date = self
            .date
            .or(self.legacy_date)
            .ok_or(SchemaError::MissingField {
                record: RECORD,
                index,
                field: "date",
            })?;

        Ok(SeriesPoint {
            date,
            new_cases: optional_count(
                RECORD,
                index,
                "newCases",
                self.new_cases.or(self.legacy_new_cases),
            )?
            .unwrap_or(0),
            cumulative_confirmed: optional_count(
                RECORD,
                index,
                "cumulativeConfirmed",
                self.cumulative_confirmed.or(self.legacy_cumulative_confirmed),
            )?
            .unwrap_or(0),
            growth_rate_percent: self
                .growth_rate_percent
                .or(self.legacy_growth_rate_percent)
                .filter(|v| v.is_finite()),
        })
    }
}

impl RawDistrict {
    fn normalize(self, record: &'static str, index: usize) -> Result<DistrictRecord, SchemaError> {
        let count = |field, value: Option<f64>, legacy: Option<f64>| {
            optional_count(record, index, field, value.or(legacy))
        };

        let district_name = self
            .district_name
            .or(self.legacy_district_name)
            .ok_or(SchemaError::MissingField {
                record,
                index,
                field: "districtName",
            })?;

        Ok(DistrictRecord {
            district_name,
            confirmed_count: count(
                "confirmedCount",
                self.confirmed_count,
                self.legacy_confirmed_count,
            )?
            .unwrap_or(0),
            new_cases: count("newCases", self.new_cases, self.legacy_new_cases)?.unwrap_or(0),
            death_count: count("deathCount", self.death_count, self.legacy_death_count)?,
            cured_count: count("curedCount", self.cured_count, self.legacy_cured_count)?,
        })
    }
}

fn normalize_series(raw: Option<Vec<RawSeriesPoint>>) -> Result<Vec<SeriesPoint>, SchemaError> {
    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, point)| point.normalize(index))
        .collect()
}

fn normalize_districts(
    record: &'static str,
    raw: Option<Vec<RawDistrict>>,
) -> Result<Vec<DistrictRecord>, SchemaError> {
    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, district)| district.normalize(record, index))
        .collect()
}

/// Accept integral, non-negative, finite numbers (pandas emits `12.0` for `12`)
fn optional_count(
    record: &'static str,
    index: usize,
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<u64>, SchemaError> {
    match value {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as u64)),
        Some(v) => Err(SchemaError::InvalidCount {
            record,
            index,
            field,
            value: v,
        }),
    }
}
