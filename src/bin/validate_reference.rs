//! Utility to check a reference table for data problems
//! Usage: cargo run --bin validate_reference -- [path/to/nutrition.csv]

use std::path::PathBuf;
use std::process::ExitCode;

use gizi::reference::{validate, ReferenceTable, ValidationIssue};

fn get_reference_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("GIZI_REFERENCE_PATH").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data").join("nutrition.csv"))
}

fn describe(issue: &ValidationIssue) -> String {
    match issue {
        ValidationIssue::UnreadableRecord { record, message } => {
            format!("row {}: unreadable record ({})", record, message)
        }
        ValidationIssue::UnknownUnit { record, category, unit } => {
            format!("row {}: {} has unknown unit '{}'", record, category, unit)
        }
        ValidationIssue::MalformedAge { record, category, age } => {
            format!("row {}: {} has malformed age '{}'", record, category, age)
        }
        ValidationIssue::MalformedValue { record, category, column, value } => {
            format!("row {}: {} has non-numeric {} '{}'", record, category, column, value)
        }
        ValidationIssue::OverlappingRanges {
            category,
            unit,
            first_record,
            first_age,
            second_record,
            second_age,
        } => format!(
            "rows {} and {}: {} ranges '{}' and '{}' overlap ({}), row {} wins",
            first_record,
            second_record,
            category,
            first_age,
            second_age,
            unit.as_str(),
            first_record
        ),
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let path = get_reference_path();
    println!("Reference table: {}", path.display());

    let table = ReferenceTable::from_path(&path)?;
    let report = validate(&table);

    println!("Rows checked: {}", report.rows_checked);
    for issue in &report.issues {
        println!("  {}", describe(issue));
    }
    println!(
        "{} malformed rows, {} malformed values, {} overlap warnings",
        report.malformed_rows, report.malformed_values, report.overlap_warnings
    );

    if report.has_malformed_rows() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
