//! Comparison results

use serde::{Deserialize, Serialize};

/// Whether a measured value stays within the daily requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    WithinLimit,
    ExceedsLimit,
}

impl ComparisonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonStatus::WithinLimit => "within_limit",
            ComparisonStatus::ExceedsLimit => "exceeds_limit",
        }
    }
}

/// One nutrient compared against its daily requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub key: String,
    pub label: String,
    pub measured_value: f64,
    pub required_value: f64,
    pub status: ComparisonStatus,
}
