//! Reference table data validation
//!
//! Lookups never fail on bad data; this report is where bad data surfaces.
//! Overlapping ranges are reported, not resolved: lookups still take the
//! first matching row in table order.

use serde::Serialize;

use super::table::ReferenceTable;
use crate::models::{AgeRange, AgeUnit, NutrientKey};
use crate::nutrition::parse_decimal;

/// A single data-quality finding
///
/// `record` is the 1-based data row number, header excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    UnreadableRecord {
        record: u64,
        message: String,
    },
    UnknownUnit {
        record: u64,
        category: String,
        unit: String,
    },
    MalformedAge {
        record: u64,
        category: String,
        age: String,
    },
    MalformedValue {
        record: u64,
        category: String,
        column: &'static str,
        value: String,
    },
    OverlappingRanges {
        category: String,
        unit: AgeUnit,
        first_record: u64,
        first_age: String,
        second_record: u64,
        second_age: String,
    },
}

impl ValidationIssue {
    /// Rows that lookups will skip entirely
    pub fn is_malformed_row(&self) -> bool {
        matches!(
            self,
            ValidationIssue::UnreadableRecord { .. }
                | ValidationIssue::UnknownUnit { .. }
                | ValidationIssue::MalformedAge { .. }
        )
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub rows_checked: usize,
    pub malformed_rows: usize,
    pub malformed_values: usize,
    pub overlap_warnings: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_malformed_rows(&self) -> bool {
        self.malformed_rows > 0
    }

    fn push(&mut self, issue: ValidationIssue) {
        if issue.is_malformed_row() {
            self.malformed_rows += 1;
        } else if matches!(issue, ValidationIssue::OverlappingRanges { .. }) {
            self.overlap_warnings += 1;
        } else {
            self.malformed_values += 1;
        }
        self.issues.push(issue);
    }
}

/// Check every row and every year/month partition of the table
pub fn validate(table: &ReferenceTable) -> ValidationReport {
    let mut report = ValidationReport {
        rows_checked: table.len(),
        ..Default::default()
    };

    for unreadable in table.unreadable_records() {
        report.push(ValidationIssue::UnreadableRecord {
            record: unreadable.record,
            message: unreadable.message.clone(),
        });
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let record = idx as u64 + 1;

        // Trimester tokens are matched verbatim; every other row needs a base range
        let usable_age = match row.unit() {
            Some(AgeUnit::Trimester) => row.age_range().is_some(),
            _ => row.base_range().is_some(),
        };

        if row.unit().is_none() {
            report.push(ValidationIssue::UnknownUnit {
                record,
                category: row.category.clone(),
                unit: row.unit.clone(),
            });
        } else if !usable_age {
            report.push(ValidationIssue::MalformedAge {
                record,
                category: row.category.clone(),
                age: row.age.clone(),
            });
        }

        for key in NutrientKey::ALL {
            if let Some(raw) = row.raw_value(key) {
                if parse_decimal(raw).is_none() {
                    report.push(ValidationIssue::MalformedValue {
                        record,
                        category: row.category.clone(),
                        column: key.column(),
                        value: raw.to_string(),
                    });
                }
            }
        }
    }

    let mut partitions: Vec<_> = table
        .partitions()
        .filter(|(key, _)| key.unit != AgeUnit::Trimester)
        .collect();
    partitions.sort_by_key(|(_, indices)| indices.first().copied());

    for (key, indices) in partitions {
        let ranged: Vec<(usize, AgeRange)> = indices
            .iter()
            .filter_map(|&idx| table.rows()[idx].base_range().map(|r| (idx, r)))
            .collect();

        for (i, (first_idx, first)) in ranged.iter().enumerate() {
            for (second_idx, second) in &ranged[i + 1..] {
                if first.overlaps(second) {
                    let first_row = &table.rows()[*first_idx];
                    let second_row = &table.rows()[*second_idx];
                    tracing::warn!(
                        "Overlapping reference ranges in {} ({}): '{}' and '{}'",
                        first_row.category,
                        key.unit.as_str(),
                        first_row.age,
                        second_row.age
                    );
                    report.push(ValidationIssue::OverlappingRanges {
                        category: first_row.category.clone(),
                        unit: key.unit,
                        first_record: *first_idx as u64 + 1,
                        first_age: first_row.age.clone(),
                        second_record: *second_idx as u64 + 1,
                        second_age: second_row.age.clone(),
                    });
                }
            }
        }
    }

    report
}
