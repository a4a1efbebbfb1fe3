//! User attributes and age units
//!
//! Caller-supplied demographic data used to pick requirement rows.

use serde::{Deserialize, Serialize};

/// Unit an age (or an age range in the reference table) is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    #[serde(alias = "tahun", alias = "years")]
    Year,
    #[serde(alias = "bulan", alias = "months")]
    Month,
    Trimester,
}

impl AgeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeUnit::Year => "year",
            AgeUnit::Month => "month",
            AgeUnit::Trimester => "trimester",
        }
    }

    /// Parse from either the English or the dataset vocabulary
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "year" | "years" | "tahun" => Some(AgeUnit::Year),
            "month" | "months" | "bulan" => Some(AgeUnit::Month),
            "trimester" => Some(AgeUnit::Trimester),
            _ => None,
        }
    }
}

/// Attributes of the person a daily requirement is resolved for
///
/// Nothing here is persisted; the caller builds one per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAttributes {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub age_unit: Option<AgeUnit>,
    #[serde(default)]
    pub is_pregnant: bool,
    /// Only read when `is_pregnant` is set
    #[serde(default)]
    pub gestational_weeks_or_months: Option<u32>,
    #[serde(default)]
    pub is_breastfeeding: bool,
    /// Only read when `is_breastfeeding` is set
    #[serde(default)]
    pub infant_age_months: Option<u32>,
}

impl UserAttributes {
    /// Gender trimmed and lowercased, `None` when absent or blank
    pub fn normalized_gender(&self) -> Option<String> {
        self.gender
            .as_deref()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_unit_from_str() {
        assert_eq!(AgeUnit::from_str("year"), Some(AgeUnit::Year));
        assert_eq!(AgeUnit::from_str(" Tahun "), Some(AgeUnit::Year));
        assert_eq!(AgeUnit::from_str("bulan"), Some(AgeUnit::Month));
        assert_eq!(AgeUnit::from_str("TRIMESTER"), Some(AgeUnit::Trimester));
        assert_eq!(AgeUnit::from_str("week"), None);
    }

    #[test]
    fn test_age_unit_deserializes_dataset_vocabulary() {
        let unit: AgeUnit = serde_json::from_str("\"bulan\"").unwrap();
        assert_eq!(unit, AgeUnit::Month);
        let unit: AgeUnit = serde_json::from_str("\"year\"").unwrap();
        assert_eq!(unit, AgeUnit::Year);
    }

    #[test]
    fn test_normalized_gender() {
        let mut attrs = UserAttributes {
            gender: Some("  Perempuan ".to_string()),
            ..Default::default()
        };
        assert_eq!(attrs.normalized_gender().as_deref(), Some("perempuan"));

        attrs.gender = Some("   ".to_string());
        assert_eq!(attrs.normalized_gender(), None);
    }

    #[test]
    fn test_attributes_default_flags() {
        let attrs: UserAttributes = serde_json::from_str(r#"{"gender": "laki-laki", "age": 25}"#).unwrap();
        assert!(!attrs.is_pregnant);
        assert!(!attrs.is_breastfeeding);
        assert_eq!(attrs.age_unit, None);
    }
}
