//! Nutrition calculation module
//!
//! Requirement resolution, label extraction and comparison.

pub mod comparator;
pub mod decimal;
pub mod label;
pub mod resolver;

pub use comparator::{classify, compare, label_for_key};
pub use decimal::{decimal_or_zero, leading_number, parse_decimal};
pub use label::{coerce_value, coerce_values, extract_label_values};
pub use resolver::{
    breastfeeding_period, find_base_row, find_supplement_row, resolve, trimester_for,
    ResolvedRequirement, RowRef, SupplementQuery,
};
