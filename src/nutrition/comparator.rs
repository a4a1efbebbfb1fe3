//! Measured vs required comparison
//!
//! Entries come out ordered lexicographically by key so that results are
//! reproducible.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ComparisonEntry, ComparisonStatus};

/// Human-readable label for a nutrient key
///
/// Underscores become spaces and every word is title-cased:
/// - "energi" -> "Energi"
/// - "lemak total" -> "Lemak Total"
/// - "total_lemak" -> "Total Lemak"
pub fn label_for_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut label = String::with_capacity(spaced.len());
    let mut previous_is_letter = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                label.extend(c.to_lowercase());
            } else {
                label.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            label.push(c);
            previous_is_letter = false;
        }
    }
    label
}

/// A zero requirement never counts as exceeded
pub fn classify(measured: f64, required: f64) -> ComparisonStatus {
    if required != 0.0 && measured > required {
        ComparisonStatus::ExceedsLimit
    } else {
        ComparisonStatus::WithinLimit
    }
}

/// Compare measured values against required values over the union of keys
pub fn compare(
    measured: &BTreeMap<String, f64>,
    required: &BTreeMap<String, f64>,
) -> Vec<ComparisonEntry> {
    let keys: BTreeSet<&String> = measured.keys().chain(required.keys()).collect();

    keys.into_iter()
        .map(|key| {
            let measured_value = measured.get(key).copied().unwrap_or(0.0);
            let required_value = required.get(key).copied().unwrap_or(0.0);
            ComparisonEntry {
                key: key.clone(),
                label: label_for_key(key),
                measured_value,
                required_value,
                status: classify(measured_value, required_value),
            }
        })
        .collect()
}
