//! Case-data source
//!
//! Reads a CSV export of per-district daily case counts and aggregates it
//! into the `/api/data` payload. The file is re-read on every request; no
//! state is kept between calls.
//!
//! Failures never escape as HTTP errors: [`CaseDataSource::build_payload`]
//! folds them into the payload's `error` field so the dashboard can show the
//! message to the user.

mod aggregate;
mod columns;

pub use aggregate::{aggregate, growth_rates, CaseRow};
pub use columns::{Column, ColumnMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::SourceConfig;
use crate::model::DashboardPayload;

/// Errors raised while reading case data
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("文件不存在: {}", .0.display())]
    NotFound(PathBuf),

    #[error("数据文件缺少必要的列: {}", format_columns(.0))]
    MissingColumns(Vec<Column>),

    #[error("数据处理错误: line {line}: invalid date '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("数据处理错误: line {line}: invalid {column} value '{value}'")]
    InvalidNumber {
        line: usize,
        column: Column,
        value: String,
    },

    #[error("数据处理错误: {0} total exceeds the supported range")]
    Overflow(&'static str),

    #[error("数据处理错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("数据处理错误: {0}")]
    Io(#[from] std::io::Error),
}

fn format_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(Column::canonical)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// CSV-backed case-data source
#[derive(Debug, Clone)]
pub struct CaseDataSource {
    path: PathBuf,
    hotspot_count: usize,
}

impl CaseDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hotspot_count: 5,
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(&config.data_file).with_hotspot_count(config.hotspot_count)
    }

    /// Builder method: number of hotspot districts reported
    pub fn with_hotspot_count(mut self, count: usize) -> Self {
        self.hotspot_count = count;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and aggregate the source file
    pub fn load(&self) -> SourceResult<DashboardPayload> {
        tracing::debug!(path = ?self.path, "Reading case data");

        if !self.exists() {
            return Err(SourceError::NotFound(self.path.clone()));
        }

        let file = std::fs::File::open(&self.path)?;
        let rows = read_rows(file)?;
        aggregate(&rows, self.hotspot_count)
    }

    /// Like [`load`](Self::load), with failures reported in the payload
    pub fn build_payload(&self) -> DashboardPayload {
        match self.load() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to build payload");
                DashboardPayload::from_error(e.to_string())
            }
        }
    }
}

/// Parse rows from CSV data with a header row
pub fn read_rows<R: Read>(reader: R) -> SourceResult<Vec<CaseRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::resolve(headers.iter());

    let missing = columns.missing_required();
    if !missing.is_empty() {
        return Err(SourceError::MissingColumns(missing));
    }

    let mut rows = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let line = line_num + 2;
        let record = result?;

        let field = |column: Column| {
            columns
                .index(column)
                .and_then(|idx| record.get(idx))
                .filter(|s| !s.is_empty())
        };

        // Blank lines in spreadsheet exports
        if record.iter().all(str::is_empty) {
            continue;
        }

        let date_str = field(Column::Date).unwrap_or_default();
        let date = parse_date(date_str).ok_or_else(|| SourceError::InvalidDate {
            line,
            value: date_str.to_string(),
        })?;

        let count = |column: Column| -> SourceResult<Option<u64>> {
            field(column)
                .map(|value| {
                    parse_count(value).ok_or_else(|| SourceError::InvalidNumber {
                        line,
                        column,
                        value: value.to_string(),
                    })
                })
                .transpose()
        };

        rows.push(CaseRow {
            date,
            district: field(Column::District).unwrap_or_default().to_string(),
            new_cases: count(Column::NewCases)?,
            confirmed: count(Column::Confirmed)?,
            deaths: count(Column::Deaths)?,
            recovered: count(Column::Recovered)?,
        });
    }

    tracing::debug!(rows = rows.len(), "Parsed case rows");
    Ok(rows)
}

/// Parse a date in any of the formats spreadsheet exports produce
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d/%m/%Y", "%Y年%m月%d日"];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Parse a non-negative integral count; `"12.0"` is accepted
fn parse_count(value: &str) -> Option<u64> {
    let value = value.replace(',', "");
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64)
}
