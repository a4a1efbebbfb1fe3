//! Nutrient keys and requirement maps
//!
//! The short names are what downstream consumers key off; the column headers
//! are what the reference dataset uses. The translation between them is fixed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::reference_row::ReferenceRow;

/// One of the seven nutrients tracked on a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NutrientKey {
    #[serde(rename = "energi")]
    Energi,
    #[serde(rename = "protein")]
    Protein,
    #[serde(rename = "lemak total")]
    LemakTotal,
    #[serde(rename = "karbohidrat")]
    Karbohidrat,
    #[serde(rename = "serat")]
    Serat,
    #[serde(rename = "gula")]
    Gula,
    #[serde(rename = "garam")]
    Garam,
}

impl NutrientKey {
    pub const ALL: [NutrientKey; 7] = [
        NutrientKey::Energi,
        NutrientKey::Protein,
        NutrientKey::LemakTotal,
        NutrientKey::Karbohidrat,
        NutrientKey::Serat,
        NutrientKey::Gula,
        NutrientKey::Garam,
    ];

    /// Short name used by the comparator and in tool payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientKey::Energi => "energi",
            NutrientKey::Protein => "protein",
            NutrientKey::LemakTotal => "lemak total",
            NutrientKey::Karbohidrat => "karbohidrat",
            NutrientKey::Serat => "serat",
            NutrientKey::Gula => "gula",
            NutrientKey::Garam => "garam",
        }
    }

    /// Column header in the reference dataset
    pub fn column(&self) -> &'static str {
        match self {
            NutrientKey::Energi => "Energi (kkal)",
            NutrientKey::Protein => "Protein (g)",
            NutrientKey::LemakTotal => "Total Lemak (g)",
            NutrientKey::Karbohidrat => "Karbohidrat (g)",
            NutrientKey::Serat => "Serat (g)",
            NutrientKey::Gula => "Gula (g)",
            NutrientKey::Garam => "Garam (mg)",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == lower)
    }

    /// Match a dataset column header, ignoring case and surrounding whitespace
    pub fn from_column(header: &str) -> Option<Self> {
        let trimmed = header.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.column().eq_ignore_ascii_case(trimmed))
    }
}

/// Resolved daily requirement per nutrient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementMap {
    values: BTreeMap<NutrientKey, f64>,
}

impl RequirementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of a single row; blank cells are left out, unparseable ones become 0
    pub fn from_row(row: &ReferenceRow) -> Self {
        let values = NutrientKey::ALL
            .into_iter()
            .filter(|key| row.raw_value(*key).is_some())
            .map(|key| (key, row.value(key)))
            .collect();
        Self { values }
    }

    /// Field-by-field sum of a base row and a supplemental row
    ///
    /// Every nutrient is present in the result, missing cells count as 0.
    pub fn merge(base: &ReferenceRow, supplement: &ReferenceRow) -> Self {
        let values = NutrientKey::ALL
            .into_iter()
            .map(|key| (key, base.value(key) + supplement.value(key)))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: NutrientKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    pub fn insert(&mut self, key: NutrientKey, value: f64) {
        self.values.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Keyed by short name, the shape the comparator consumes
    pub fn to_keyed(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), *v))
            .collect()
    }

    /// Union of both maps with missing values counted as 0
    pub fn add(&self, other: &RequirementMap) -> Self {
        let mut values = self.values.clone();
        for (key, value) in other.iter() {
            *values.entry(key).or_insert(0.0) += value;
        }
        Self { values }
    }
}

impl std::ops::Add for RequirementMap {
    type Output = RequirementMap;

    fn add(self, other: RequirementMap) -> RequirementMap {
        RequirementMap::add(&self, &other)
    }
}
