//! Gizi
//!
//! An MCP server for daily nutrient requirements and nutrition label comparison.

use std::path::PathBuf;
use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

mod build_info;
mod mcp;
mod models;
mod nutrition;
mod reference;
mod tools;

use mcp::GiziService;

/// Get the reference table path from environment or use default
fn get_reference_path() -> PathBuf {
    std::env::var("GIZI_REFERENCE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("nutrition.csv");
            path
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they stay out of the MCP stdio stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gizi=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let reference_path = get_reference_path();
    build_info::print_startup_banner(&reference_path);
    eprintln!("Starting MCP server on stdio...");

    let table = reference::ReferenceTable::from_path(&reference_path)?;
    let report = reference::validate(&table);
    if !report.is_clean() {
        tracing::warn!(
            "Reference table has {} malformed rows, {} malformed values and {} overlapping ranges",
            report.malformed_rows,
            report.malformed_values,
            report.overlap_warnings
        );
    }

    let service = GiziService::new(reference_path, table);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
