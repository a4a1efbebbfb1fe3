//! Reference table rows
//!
//! One row of the daily requirement dataset, kept as raw strings so that bad
//! cells can be skipped at lookup time instead of rejecting the whole file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attributes::AgeUnit;
use super::nutrient::NutrientKey;
use crate::nutrition::decimal_or_zero;

/// Numeric age range parsed from an age token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgeRange {
    /// `min-max`, both ends inclusive
    Between { min: u32, max: u32 },
    /// `min+` or a bare `min`
    AtLeast { min: u32 },
}

impl AgeRange {
    /// Parse an age token
    ///
    /// Examples:
    /// - "19-29" -> Between { min: 19, max: 29 }
    /// - "1 - 6" -> Between { min: 1, max: 6 }
    /// - "65-80+" -> Between { min: 65, max: 80 }
    /// - "80+" -> AtLeast { min: 80 }
    pub fn parse(token: &str) -> Option<Self> {
        let trimmed = token.trim();

        if let Some((min, max)) = trimmed.split_once('-') {
            let min = min.trim().parse().ok()?;
            let max = max.trim().trim_end_matches('+').trim().parse().ok()?;
            return Some(AgeRange::Between { min, max });
        }

        let bare = trimmed.trim_end_matches('+');
        if !bare.is_empty() && bare.chars().all(|c| c.is_ascii_digit()) {
            return bare.parse().ok().map(|min| AgeRange::AtLeast { min });
        }

        None
    }

    pub fn contains(&self, age: u32) -> bool {
        match *self {
            AgeRange::Between { min, max } => min <= age && age <= max,
            AgeRange::AtLeast { min } => age >= min,
        }
    }

    pub fn overlaps(&self, other: &AgeRange) -> bool {
        let (a_min, a_max) = self.bounds();
        let (b_min, b_max) = other.bounds();
        a_min <= b_max && b_min <= a_max
    }

    fn bounds(&self) -> (u32, u32) {
        match *self {
            AgeRange::Between { min, max } => (min, max),
            AgeRange::AtLeast { min } => (min, u32::MAX),
        }
    }
}

/// A row of the reference dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub category: String,
    /// Raw age token: a range, an open-ended minimum, or a period token
    pub age: String,
    /// Raw unit as written in the dataset
    pub unit: String,
    #[serde(default)]
    pub nutrients: BTreeMap<NutrientKey, String>,
}

impl ReferenceRow {
    pub fn new(category: impl Into<String>, age: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            age: age.into(),
            unit: unit.into(),
            nutrients: BTreeMap::new(),
        }
    }

    pub fn with_nutrient(mut self, key: NutrientKey, value: impl Into<String>) -> Self {
        self.nutrients.insert(key, value.into());
        self
    }

    /// Category trimmed and lowercased, the form lookups compare against
    pub fn category_key(&self) -> String {
        self.category.trim().to_lowercase()
    }

    pub fn unit(&self) -> Option<AgeUnit> {
        AgeUnit::from_str(&self.unit)
    }

    pub fn age_range(&self) -> Option<AgeRange> {
        AgeRange::parse(&self.age)
    }

    /// Range a base-row lookup can match against
    ///
    /// Month rows only match as a `min-max` range, and trimester rows are
    /// supplements keyed by their token, so both yield `None` otherwise.
    pub fn base_range(&self) -> Option<AgeRange> {
        match self.unit()? {
            AgeUnit::Month if !self.age.contains('-') => None,
            AgeUnit::Trimester => None,
            _ => self.age_range(),
        }
    }

    /// Age token with all whitespace removed, so "1 - 6" equals "1-6"
    pub fn period_token(&self) -> String {
        self.age.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Raw cell, `None` when the column is missing or the cell is blank
    pub fn raw_value(&self, key: NutrientKey) -> Option<&str> {
        self.nutrients
            .get(&key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Numeric cell value, 0 when missing or unparseable
    pub fn value(&self, key: NutrientKey) -> f64 {
        self.raw_value(key).map(decimal_or_zero).unwrap_or(0.0)
    }
}
