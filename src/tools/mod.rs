//! Gizi Tools module
//!
//! Tool implementations the MCP server routes to.

pub mod comparison;
pub mod reference;
pub mod requirements;
pub mod status;
