//! Reference table tools

use std::path::Path;

use serde::Serialize;

use crate::reference::{validate, ReferenceTable, TableSummary, ValidationReport};

/// Response for validate_reference_table
#[derive(Debug, Serialize)]
pub struct ValidateReferenceResponse {
    pub summary: TableSummary,
    pub report: ValidationReport,
}

/// Response for reload_reference_table
#[derive(Debug, Serialize)]
pub struct ReloadReferenceResponse {
    pub success: bool,
    pub message: String,
    pub summary: TableSummary,
    pub malformed_rows: usize,
    pub overlap_warnings: usize,
}

pub fn validate_reference_table(table: &ReferenceTable) -> ValidateReferenceResponse {
    ValidateReferenceResponse {
        summary: table.summary(),
        report: validate(table),
    }
}

/// Load a fresh table from disk, returning it alongside a response for the caller
pub fn load_reference_table(path: &Path) -> Result<(ReferenceTable, ReloadReferenceResponse), String> {
    let table = ReferenceTable::from_path(path).map_err(|e| e.to_string())?;
    let report = validate(&table);

    let response = ReloadReferenceResponse {
        success: true,
        message: format!("Loaded {} reference rows from {}", table.len(), path.display()),
        summary: table.summary(),
        malformed_rows: report.malformed_rows,
        overlap_warnings: report.overlap_warnings,
    };
    Ok((table, response))
}
