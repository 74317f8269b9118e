//! Case-data aggregation
//!
//! Turns per-district daily rows into the dashboard payload: a city-wide
//! daily series, the latest-date district slice, the hotspot ranking and
//! the headline summary.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::{SourceError, SourceResult};
use crate::model::{DashboardPayload, DistrictRecord, SeriesPoint, SummaryRecord, UNKNOWN_DATE};

/// Share of confirmed cases reported as deaths when the data has none
const SIMULATED_DEATH_PERCENT: u64 = 2;
/// Share of confirmed cases reported as cured when the data has none
const SIMULATED_CURED_PERCENT: u64 = 80;

/// One parsed data row
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRow {
    pub date: NaiveDate,
    pub district: String,
    pub new_cases: Option<u64>,
    pub confirmed: Option<u64>,
    pub deaths: Option<u64>,
    pub recovered: Option<u64>,
}

#[derive(Debug, Default)]
struct Totals {
    new_cases: u64,
    confirmed: Option<u64>,
    deaths: Option<u64>,
    recovered: Option<u64>,
}

impl Totals {
    fn add(&mut self, row: &CaseRow) -> SourceResult<()> {
        self.new_cases = checked_add(self.new_cases, row.new_cases.unwrap_or(0), "new cases")?;
        self.confirmed = max_opt(self.confirmed, row.confirmed);
        self.deaths = max_opt(self.deaths, row.deaths);
        self.recovered = max_opt(self.recovered, row.recovered);
        Ok(())
    }
}

fn checked_add(a: u64, b: u64, field: &'static str) -> SourceResult<u64> {
    a.checked_add(b).ok_or(SourceError::Overflow(field))
}

fn checked_sum(values: impl IntoIterator<Item = u64>, field: &'static str) -> SourceResult<u64> {
    values
        .into_iter()
        .try_fold(0u64, |total, value| checked_add(total, value, field))
}

/// `percent` of `total`, floored
fn share(total: u64, percent: u64, field: &'static str) -> SourceResult<u64> {
    total
        .checked_mul(percent)
        .map(|v| v / 100)
        .ok_or(SourceError::Overflow(field))
}

fn max_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Day-over-day growth of new cases in percent, rounded to two decimals.
/// The first day, and any day following a zero day, is 0.
pub fn growth_rates(new_cases: &[u64]) -> Vec<f64> {
    let mut rates = Vec::with_capacity(new_cases.len());
    for (i, &current) in new_cases.iter().enumerate() {
        let rate = match i.checked_sub(1).map(|p| new_cases[p]) {
            Some(prev) if prev > 0 => {
                let raw = (current as f64 - prev as f64) / prev as f64 * 100.0;
                (raw * 100.0).round() / 100.0
            }
            _ => 0.0,
        };
        rates.push(rate);
    }
    rates
}

/// Aggregate rows into the dashboard payload. Counts whose totals do not
/// fit in a `u64` are an error.
pub fn aggregate(rows: &[CaseRow], hotspot_count: usize) -> SourceResult<DashboardPayload> {
    let mut by_date: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for row in rows {
        by_date.entry(row.date).or_default().add(row)?;
    }

    let daily_new: Vec<u64> = by_date.values().map(|t| t.new_cases).collect();
    let rates = growth_rates(&daily_new);

    let time_trend: Vec<SeriesPoint> = by_date
        .iter()
        .zip(rates)
        .map(|((date, totals), rate)| {
            SeriesPoint::new(
                date.format("%Y-%m-%d").to_string(),
                totals.new_cases,
                totals.confirmed.unwrap_or(0),
            )
            .growth_rate(rate)
        })
        .collect();

    let latest_date = by_date.keys().next_back().copied();

    let mut by_district: BTreeMap<&str, Totals> = BTreeMap::new();
    for row in rows.iter().filter(|r| Some(r.date) == latest_date) {
        by_district.entry(row.district.as_str()).or_default().add(row)?;
    }

    let district_data: Vec<DistrictRecord> = by_district
        .into_iter()
        .map(|(name, totals)| DistrictRecord {
            district_name: name.to_string(),
            confirmed_count: totals.confirmed.unwrap_or(0),
            new_cases: totals.new_cases,
            death_count: totals.deaths,
            cured_count: totals.recovered,
        })
        .collect();

    let mut hotspot_districts = district_data.clone();
    hotspot_districts.sort_by(|a, b| b.confirmed_count.cmp(&a.confirmed_count));
    hotspot_districts.truncate(hotspot_count);

    let summary = summarize(&district_data, latest_date)?;

    tracing::debug!(
        days = time_trend.len(),
        districts = district_data.len(),
        latest = %summary.latest_date,
        "Aggregated case data"
    );

    Ok(DashboardPayload {
        summary: Some(summary),
        time_trend,
        district_data,
        hotspot_districts,
        error: None,
    })
}

fn summarize(
    districts: &[DistrictRecord],
    latest_date: Option<NaiveDate>,
) -> SourceResult<SummaryRecord> {
    let total_confirmed = checked_sum(districts.iter().map(|d| d.confirmed_count), "confirmed")?;
    let new_cases_today = checked_sum(districts.iter().map(|d| d.new_cases), "new cases")?;

    let mut death_cases = checked_sum(districts.iter().filter_map(|d| d.death_count), "deaths")?;
    let mut cured_cases = checked_sum(districts.iter().filter_map(|d| d.cured_count), "cured")?;

    if death_cases == 0 {
        death_cases = share(total_confirmed, SIMULATED_DEATH_PERCENT, "deaths")?;
        tracing::debug!(death_cases, "No death data, using simulated count");
    }
    if cured_cases == 0 {
        cured_cases = share(total_confirmed, SIMULATED_CURED_PERCENT, "cured")?;
        tracing::debug!(cured_cases, "No recovery data, using simulated count");
    }

    Ok(SummaryRecord {
        total_confirmed,
        new_cases_today,
        death_cases,
        cured_cases,
        latest_date: latest_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
    })
}
