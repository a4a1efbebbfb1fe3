//! Build metadata for the Gizi server
//!
//! Compile-time constants embedded by `build.rs`: build number, build time and
//! the number of rows in the reference dataset shipped under `data/`.

use std::path::Path;

use serde::Serialize;

/// Build number, incremented on each recompilation
pub const BUILD_NUMBER: u64 = match option_env!("GIZI_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("GIZI_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Rows in the shipped `data/nutrition.csv` when this binary was built
pub const SHIPPED_DATASET_ROWS: u64 = match option_env!("GIZI_SHIPPED_DATASET_ROWS") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// `str::parse` is not const, so the build number is parsed by hand
const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

/// Build information for the status tool
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
    pub shipped_dataset_rows: u64,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
            shipped_dataset_rows: SHIPPED_DATASET_ROWS,
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Print the startup banner to stderr (stdout carries the MCP stream)
pub fn print_startup_banner(reference_path: &Path) {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  Gizi - Daily Nutrient Requirements");
    eprintln!("  Version: {} | Build: {}", info.version, info.build_number);
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("  Shipped dataset: {} rows", info.shipped_dataset_rows);
    eprintln!("  Reference table: {}", reference_path.display());
    eprintln!("===============================================");
}
