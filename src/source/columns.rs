//! Column resolution
//!
//! Case-data exports name their columns inconsistently. Each logical column
//! has an ordered alias list; the first alias present in the header wins.

use std::fmt;

/// Logical columns of a case-data export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    District,
    NewCases,
    Confirmed,
    Deaths,
    Recovered,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Date,
        Column::District,
        Column::NewCases,
        Column::Confirmed,
        Column::Deaths,
        Column::Recovered,
    ];

    pub const REQUIRED: [Column; 4] = [
        Column::Date,
        Column::District,
        Column::NewCases,
        Column::Confirmed,
    ];

    /// Canonical (native) column name
    pub fn canonical(&self) -> &'static str {
        match self {
            Column::Date => "日期",
            Column::District => "地区",
            Column::NewCases => "新增病例",
            Column::Confirmed => "确诊数",
            Column::Deaths => "死亡数",
            Column::Recovered => "康复数",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Date => &["报告日期", "日期", "日", "时间", "date"],
            Column::District => &["地区名称", "地区", "区域", "行政区", "district"],
            Column::NewCases => &["新增确诊", "新增", "当日新增", "新增感染", "new cases"],
            Column::Confirmed => &["累计确诊", "累计", "总确诊", "确诊总数", "total cases"],
            Column::Deaths => &["累计死亡", "死亡", "死亡病例", "死亡总数", "death cases"],
            Column::Recovered => &[
                "累计康复",
                "康复",
                "治愈",
                "康复总数",
                "累计治愈",
                "recovered cases",
            ],
        }
    }

    /// Substrings tried when no alias matches; only optional columns have any
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Column::Deaths => &["死亡"],
            Column::Recovered => &["康复", "治愈"],
            _ => &[],
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Header positions of each logical column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    indices: [Option<usize>; 6],
}

impl ColumnMap {
    /// Resolve logical columns against a header row
    pub fn resolve<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let headers: Vec<&str> = headers.into_iter().map(str::trim).collect();
        let mut map = ColumnMap::default();

        for (slot, column) in Column::ALL.iter().enumerate() {
            let by_alias = column
                .aliases()
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == alias));

            let found = by_alias.or_else(|| {
                headers
                    .iter()
                    .position(|h| column.keywords().iter().any(|k| h.contains(k)))
            });

            match found {
                Some(idx) => {
                    tracing::debug!(column = %column, header = headers[idx], "Resolved column");
                }
                None => {
                    tracing::debug!(column = %column, "No header matches column");
                }
            }

            map.indices[slot] = found;
        }

        map
    }

    pub fn index(&self, column: Column) -> Option<usize> {
        let slot = Column::ALL.iter().position(|c| *c == column)?;
        self.indices[slot]
    }

    /// Required columns that could not be resolved
    pub fn missing_required(&self) -> Vec<Column> {
        Column::REQUIRED
            .into_iter()
            .filter(|c| self.index(*c).is_none())
            .collect()
    }
}
