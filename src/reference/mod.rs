//! Reference table module
//!
//! Loads the daily requirement dataset and checks it for data problems.

pub mod table;
pub mod validation;

pub use table::{
    PartitionKey, PartitionSummary, ReferenceError, ReferenceResult, ReferenceTable,
    TableSummary, UnreadableRecord,
};
pub use validation::{validate, ValidationIssue, ValidationReport};
