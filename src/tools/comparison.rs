//! Label comparison tools
//!
//! Combine OCR extraction, requirement resolution and the comparator. The
//! recommendation payload is built here but never sent anywhere.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::requirements::REQUIREMENT_NOT_FOUND;
use crate::models::{ComparisonEntry, ComparisonStatus, UserAttributes};
use crate::nutrition::{coerce_values, compare, extract_label_values, resolve};
use crate::reference::ReferenceTable;

/// Response for compare_nutrition
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub comparison: Vec<ComparisonEntry>,
    /// Keys whose measured value exceeds the requirement
    pub exceeded: Vec<String>,
}

impl ComparisonResponse {
    fn from_entries(comparison: Vec<ComparisonEntry>) -> Self {
        let exceeded = comparison
            .iter()
            .filter(|e| e.status == ComparisonStatus::ExceedsLimit)
            .map(|e| e.key.clone())
            .collect();
        Self {
            comparison,
            exceeded,
        }
    }
}

/// Body the recommendation service expects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationPayload {
    pub konsumsi: BTreeMap<String, f64>,
    pub target_harian: BTreeMap<String, f64>,
}

/// Response for compare_label
#[derive(Debug, Serialize)]
pub struct LabelComparisonResponse {
    pub kandungan_gizi: BTreeMap<String, f64>,
    pub kebutuhan_harian: Option<BTreeMap<String, f64>>,
    pub comparison: Vec<ComparisonEntry>,
    pub exceeded: Vec<String>,
    /// Only present when a requirement was resolved
    pub recommendation_payload: Option<RecommendationPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

pub fn compare_nutrition(
    measured: &BTreeMap<String, f64>,
    required: &BTreeMap<String, f64>,
) -> ComparisonResponse {
    ComparisonResponse::from_entries(compare(measured, required))
}

/// Compare caller-supplied values that may arrive as numbers or numeric strings
///
/// Values that do not parse count as 0.
pub fn compare_values(measured: &Map<String, Value>, required: &Map<String, Value>) -> ComparisonResponse {
    compare_nutrition(&coerce_values(measured), &coerce_values(required))
}

/// Compare an OCR result against the user's resolved daily requirement
///
/// When no requirement resolves, every nutrient is compared against zero and
/// therefore reported within limit, with a warning attached.
pub fn compare_label(
    table: &ReferenceTable,
    ocr_result: &Map<String, Value>,
    attrs: &UserAttributes,
) -> LabelComparisonResponse {
    let kandungan_gizi = extract_label_values(ocr_result);
    let required = resolve(attrs, table).map(|r| r.requirements.to_keyed());

    let empty = BTreeMap::new();
    let response = compare_nutrition(&kandungan_gizi, required.as_ref().unwrap_or(&empty));

    let recommendation_payload = required.as_ref().map(|target| RecommendationPayload {
        konsumsi: kandungan_gizi.clone(),
        target_harian: target.clone(),
    });
    let warning = required.is_none().then_some(REQUIREMENT_NOT_FOUND);

    tracing::info!(
        "Compared {} label nutrients, {} exceed the daily requirement",
        kandungan_gizi.len(),
        response.exceeded.len()
    );

    LabelComparisonResponse {
        kandungan_gizi,
        kebutuhan_harian: required,
        comparison: response.comparison,
        exceeded: response.exceeded,
        recommendation_payload,
        warning,
    }
}
