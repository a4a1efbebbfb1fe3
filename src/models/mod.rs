//! Data models
//!
//! Plain data shared by the resolver, the comparator and the tool layer.

mod attributes;
mod comparison;
mod nutrient;
mod reference_row;

pub use attributes::{AgeUnit, UserAttributes};
pub use comparison::{ComparisonEntry, ComparisonStatus};
pub use nutrient::{NutrientKey, RequirementMap};
pub use reference_row::{AgeRange, ReferenceRow};
