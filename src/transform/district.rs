//! District naming and risk classification
//!
//! The case data names districts in Chinese while the shape resource names
//! them in English. `DistrictNameMap` translates in both directions and
//! `RiskLadder` buckets confirmed counts; `DistrictClassifier` combines the
//! two into the records the map panel draws.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::model::DistrictRecord;

/// English / Chinese names of the 18 districts
const HONG_KONG_DISTRICTS: [(&str, &str); 18] = [
    ("Central and Western", "中西区"),
    ("Eastern", "东区"),
    ("Islands", "离岛区"),
    ("Kowloon City", "九龙城区"),
    ("Kwai Tsing", "葵青区"),
    ("Kwun Tong", "观塘区"),
    ("North", "北区"),
    ("Sai Kung", "西贡区"),
    ("Sha Tin", "沙田区"),
    ("Sham Shui Po", "深水埗区"),
    ("Southern", "南区"),
    ("Tai Po", "大埔区"),
    ("Tsuen Wan", "荃湾区"),
    ("Tuen Mun", "屯门区"),
    ("Wan Chai", "湾仔区"),
    ("Wong Tai Sin", "黄大仙区"),
    ("Yau Tsim Mong", "油尖旺区"),
    ("Yuen Long", "元朗区"),
];

/// Bidirectional district name table
#[derive(Debug, Clone)]
pub struct DistrictNameMap {
    lookup: HashMap<String, String>,
}

impl DistrictNameMap {
    /// Build from `(a, b)` pairs; each name resolves to its partner
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut lookup = HashMap::new();
        for (a, b) in pairs {
            lookup.insert(a.to_string(), b.to_string());
            lookup.insert(b.to_string(), a.to_string());
        }
        Self { lookup }
    }

    /// The 18 Hong Kong districts
    pub fn hong_kong() -> Self {
        Self::from_pairs(HONG_KONG_DISTRICTS)
    }

    /// Name in the other convention, or `name` itself when unmapped
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.lookup.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Number of names known (both conventions)
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

impl Default for DistrictNameMap {
    fn default() -> Self {
        Self::hong_kong()
    }
}

/// Severity bucket derived from confirmed cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskBucket {
    VeryLow,
    Low,
    Medium,
    MediumHigh,
    High,
}

impl RiskBucket {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            RiskBucket::High => "高风险",
            RiskBucket::MediumHigh => "中高风险",
            RiskBucket::Medium => "中风险",
            RiskBucket::Low => "低风险",
            RiskBucket::VeryLow => "极低风险",
        }
    }
}

impl fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered `(threshold, bucket)` steps; a count strictly above a threshold
/// lands in that step's bucket
#[derive(Debug, Clone)]
pub struct RiskLadder {
    steps: Vec<(u64, RiskBucket)>,
    floor: RiskBucket,
}

impl RiskLadder {
    /// Steps are sorted high-to-low regardless of input order
    pub fn new(mut steps: Vec<(u64, RiskBucket)>, floor: RiskBucket) -> Self {
        steps.sort_by(|a, b| b.0.cmp(&a.0));
        Self { steps, floor }
    }

    /// First step whose threshold the count exceeds, else the floor
    pub fn classify(&self, confirmed: u64) -> RiskBucket {
        self.steps
            .iter()
            .find(|(threshold, _)| confirmed > *threshold)
            .map(|(_, bucket)| *bucket)
            .unwrap_or(self.floor)
    }

    pub fn steps(&self) -> &[(u64, RiskBucket)] {
        &self.steps
    }
}

impl Default for RiskLadder {
    fn default() -> Self {
        Self::new(
            vec![
                (5000, RiskBucket::High),
                (2000, RiskBucket::MediumHigh),
                (1000, RiskBucket::Medium),
                (500, RiskBucket::Low),
            ],
            RiskBucket::VeryLow,
        )
    }
}

/// One district, ready for the map panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDistrict {
    /// Name used to match the shape resource
    pub name: String,
    /// Name as reported in the case data
    pub native_name: String,
    pub confirmed: u64,
    pub risk: RiskBucket,
}

/// Pure district classifier over injected naming and threshold tables
#[derive(Debug, Clone, Default)]
pub struct DistrictClassifier {
    names: DistrictNameMap,
    ladder: RiskLadder,
}

impl DistrictClassifier {
    pub fn new(names: DistrictNameMap, ladder: RiskLadder) -> Self {
        Self { names, ladder }
    }

    pub fn classify(&self, record: &DistrictRecord) -> ClassifiedDistrict {
        ClassifiedDistrict {
            name: self.names.resolve(&record.district_name).to_string(),
            native_name: record.district_name.clone(),
            confirmed: record.confirmed_count,
            risk: self.ladder.classify(record.confirmed_count),
        }
    }

    pub fn classify_all(&self, records: &[DistrictRecord]) -> Vec<ClassifiedDistrict> {
        records.iter().map(|r| self.classify(r)).collect()
    }

    pub fn names(&self) -> &DistrictNameMap {
        &self.names
    }

    pub fn ladder(&self) -> &RiskLadder {
        &self.ladder
    }
}
