//! Gizi Library
//!
//! Daily nutrient requirement resolution and nutrition label comparison.

pub mod build_info;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod reference;
pub mod tools;
