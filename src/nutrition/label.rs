//! Nutrition label values from OCR output
//!
//! The OCR service returns a loose JSON object. Only the main nutrients are
//! kept, keyed by their short names.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::decimal::leading_number;
use crate::models::NutrientKey;

/// Alternative spelling some labels use for total fat
const TOTAL_FAT_ALIAS: &str = "total lemak";

/// Coerce an OCR value to a number
///
/// Numbers pass through; strings like "65,5" or "12 g" use their numeric prefix.
pub fn coerce_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }
}

fn lookup<'a>(ocr: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    ocr.get(key)
        .or_else(|| {
            ocr.iter()
                .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
        .filter(|v| !v.is_null())
}

/// Extract the main nutrients from an OCR result
///
/// Nutrients missing from the result are left out; values that are present
/// but not numeric count as 0.
pub fn extract_label_values(ocr: &Map<String, Value>) -> BTreeMap<String, f64> {
    let mut values = BTreeMap::new();

    for key in NutrientKey::ALL {
        let mut raw = lookup(ocr, key.as_str());
        if raw.is_none() && key == NutrientKey::LemakTotal {
            raw = lookup(ocr, TOTAL_FAT_ALIAS);
        }

        if let Some(raw) = raw {
            let value = coerce_value(raw).unwrap_or_else(|| {
                tracing::warn!("Non-numeric OCR value for {}: {}", key.as_str(), raw);
                0.0
            });
            values.insert(key.as_str().to_string(), value);
        }
    }

    values
}

/// Coerce every value of a loose JSON object, 0 for anything non-numeric
pub fn coerce_values(values: &Map<String, Value>) -> BTreeMap<String, f64> {
    values
        .iter()
        .map(|(key, raw)| {
            let value = coerce_value(raw).unwrap_or_else(|| {
                tracing::warn!("Non-numeric value for {}: {}", key, raw);
                0.0
            });
            (key.clone(), value)
        })
        .collect()
}
