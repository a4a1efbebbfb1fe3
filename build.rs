//! Build script for Gizi
//!
//! Bumps the build number and embeds it, the build time and the row count of
//! the shipped reference dataset.

use std::fs;
use std::path::Path;

const SHIPPED_DATASET: &str = "data/nutrition.csv";

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed={}", SHIPPED_DATASET);

    let build_number_path = Path::new("build_number.txt");
    let current_build: u64 = fs::read_to_string(build_number_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let new_build = current_build + 1;

    fs::write(build_number_path, new_build.to_string())
        .expect("Failed to write build number file");

    // Header excluded, blank lines ignored; quoted newlines do not occur in the dataset
    let dataset_rows = fs::read_to_string(SHIPPED_DATASET)
        .map(|csv| csv.lines().skip(1).filter(|l| !l.trim().is_empty()).count())
        .unwrap_or(0);

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=GIZI_BUILD_NUMBER={}", new_build);
    println!("cargo:rustc-env=GIZI_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=GIZI_SHIPPED_DATASET_ROWS={}", dataset_rows);
}
