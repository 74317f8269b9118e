//! Derived values computed before chart configuration
//!
//! - [`moving_average`]: trailing mean tolerant of missing values
//! - [`district`]: bilingual district names and risk buckets

pub mod district;
pub mod moving_average;

pub use district::{ClassifiedDistrict, DistrictClassifier, DistrictNameMap, RiskBucket, RiskLadder};
pub use moving_average::{moving_average, moving_average_dense};
