//! Gizi Status Tool
//!
//! Runtime status of the service plus the usage guide handed to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage instructions for AI assistants
pub const GIZI_INSTRUCTIONS: &str = r#"
# Gizi Usage Instructions

Gizi resolves a person's daily nutrient requirement from a reference table and
compares nutrition label values against it.

## Nutrient Keys

All tools use these short names:

| Key | Dataset column | Unit |
|-----|----------------|------|
| energi | Energi (kkal) | kcal |
| protein | Protein (g) | g |
| lemak total | Total Lemak (g) | g |
| karbohidrat | Karbohidrat (g) | g |
| serat | Serat (g) | g |
| gula | Gula (g) | g |
| garam | Garam (mg) | mg |

## User Attributes

| Field | Notes |
|-------|-------|
| gender | Must match a category in the table, e.g. "Laki-laki" or "Perempuan" |
| age | Whole number |
| age_unit | "year"/"tahun" or "month"/"bulan". Months select the "Bayi/Anak" rows |
| is_pregnant | Adds the trimester supplement |
| gestational_weeks_or_months | 1-3 -> trimester 1, 4-6 -> trimester 2, later -> trimester 3 |
| is_breastfeeding | Adds the breastfeeding supplement (ignored when pregnant) |
| infant_age_months | Up to 6 -> period 1-6, older -> period 7-12 |

gender, age and age_unit are all needed for the base requirement. If only a
supplement matches, the supplement values are returned on their own.

## Workflow

1. `get_daily_requirements` with the user's attributes.
2. `compare_label` with the raw OCR result and the same attributes, or
   `compare_nutrition` with already-extracted values.
3. Entries with status `exceeds_limit` go over the daily requirement. A zero or
   missing requirement is never exceeded.
4. `compare_label` returns a `recommendation_payload` ready to forward to the
   recommendation service.

## Data Problems

Malformed reference rows are skipped, unreadable values count as 0. Run
`validate_reference_table` to list them, including overlapping age ranges
(the first row in the file wins).
"#;

/// Runtime status of the Gizi service
#[derive(Debug, Clone, Serialize)]
pub struct GiziStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Reference table information
    pub reference_path: String,
    pub reference_rows: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    reference_path: PathBuf,
}

impl StatusTracker {
    pub fn new(reference_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            reference_path,
        }
    }

    pub fn get_status(&self, reference_rows: usize) -> GiziStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        GiziStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            reference_path: self.reference_path.display().to_string(),
            reference_rows,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_reference() {
        let tracker = StatusTracker::new(PathBuf::from("data/nutrition.csv"));
        let status = tracker.get_status(42);
        assert_eq!(status.reference_rows, 42);
        assert_eq!(status.reference_path, "data/nutrition.csv");
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_instructions_cover_every_nutrient() {
        for key in crate::models::NutrientKey::ALL {
            assert!(GIZI_INSTRUCTIONS.contains(key.as_str()));
            assert!(GIZI_INSTRUCTIONS.contains(key.column()));
        }
    }
}
