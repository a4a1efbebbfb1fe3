//! Daily requirement resolution
//!
//! Picks a base row by gender and age, optionally a supplemental row for
//! pregnancy or breastfeeding, and merges the two into a requirement map.
//! Rows with tokens that do not parse are treated as non-matching.

use serde::Serialize;

use crate::models::{AgeUnit, ReferenceRow, RequirementMap, UserAttributes};
use crate::reference::ReferenceTable;

/// Category of the infant/child rows, looked up by age in months
pub const INFANT_CATEGORY: &str = "Bayi/Anak";
/// Category prefix of the pregnancy supplement rows
pub const PREGNANCY_PREFIX: &str = "hamil";
/// Category prefix of the breastfeeding supplement rows
pub const BREASTFEEDING_PREFIX: &str = "menyusui";

/// Which supplemental row to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplementQuery {
    Pregnancy { trimester: &'static str },
    Breastfeeding { period: &'static str },
}

impl SupplementQuery {
    /// Pregnancy wins when both flags are set
    pub fn from_attributes(attrs: &UserAttributes) -> Option<Self> {
        if attrs.is_pregnant {
            if let Some(gestation) = attrs.gestational_weeks_or_months {
                return Some(SupplementQuery::Pregnancy {
                    trimester: trimester_for(gestation),
                });
            }
        }
        if attrs.is_breastfeeding {
            if let Some(infant_age) = attrs.infant_age_months {
                return Some(SupplementQuery::Breastfeeding {
                    period: breastfeeding_period(infant_age),
                });
            }
        }
        None
    }
}

/// Trimester bucket for a gestational age
pub fn trimester_for(gestation: u32) -> &'static str {
    match gestation {
        0..=3 => "1",
        4..=6 => "2",
        _ => "3",
    }
}

/// Breastfeeding period bucket for an infant age in months
pub fn breastfeeding_period(infant_age_months: u32) -> &'static str {
    if infant_age_months <= 6 {
        "1-6"
    } else {
        "7-12"
    }
}

/// Identifies the reference row a value came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRef {
    /// 1-based data row number
    pub record: usize,
    pub category: String,
    pub age: String,
    pub unit: String,
}

impl RowRef {
    fn new(idx: usize, row: &ReferenceRow) -> Self {
        Self {
            record: idx + 1,
            category: row.category.clone(),
            age: row.age.clone(),
            unit: row.unit.clone(),
        }
    }
}

/// A requirement map together with the rows it was built from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRequirement {
    pub requirements: RequirementMap,
    pub base: Option<RowRef>,
    pub supplement: Option<RowRef>,
}

/// Find the base row for gender, age and age unit
///
/// Needs all three; units other than year and month never match.
pub fn find_base_row<'a>(
    attrs: &UserAttributes,
    table: &'a ReferenceTable,
) -> Option<(usize, &'a ReferenceRow)> {
    let gender = attrs.normalized_gender()?;
    let age = attrs.age?;
    let unit = attrs.age_unit?;

    match unit {
        AgeUnit::Year => table
            .partition(&gender, AgeUnit::Year)
            .find(|(_, row)| row.base_range().is_some_and(|range| range.contains(age))),
        AgeUnit::Month => table
            .partition(INFANT_CATEGORY, AgeUnit::Month)
            .find(|(_, row)| row.base_range().is_some_and(|range| range.contains(age))),
        AgeUnit::Trimester => {
            tracing::debug!("No base row lookup for age unit '{}'", unit.as_str());
            None
        }
    }
}

/// Find the pregnancy or breastfeeding row for the attributes, if any
pub fn find_supplement_row<'a>(
    attrs: &UserAttributes,
    table: &'a ReferenceTable,
) -> Option<(usize, &'a ReferenceRow)> {
    match SupplementQuery::from_attributes(attrs)? {
        SupplementQuery::Pregnancy { trimester } => table
            .with_category_prefix(PREGNANCY_PREFIX, AgeUnit::Trimester)
            .into_iter()
            .find(|(_, row)| row.age.trim() == trimester),
        SupplementQuery::Breastfeeding { period } => table
            .with_category_prefix(BREASTFEEDING_PREFIX, AgeUnit::Month)
            .into_iter()
            .find(|(_, row)| row.period_token() == period),
    }
}

/// Resolve the daily requirement for a user
///
/// Returns `None` when neither a base row nor a supplemental row matched.
pub fn resolve(attrs: &UserAttributes, table: &ReferenceTable) -> Option<ResolvedRequirement> {
    tracing::debug!(
        "Resolving daily requirement: gender={:?}, age={:?}, age_unit={:?}, pregnant={}, gestation={:?}, breastfeeding={}, infant_age={:?}",
        attrs.gender,
        attrs.age,
        attrs.age_unit,
        attrs.is_pregnant,
        attrs.gestational_weeks_or_months,
        attrs.is_breastfeeding,
        attrs.infant_age_months
    );

    let base = find_base_row(attrs, table);
    let supplement = find_supplement_row(attrs, table);

    let requirements = match (base, supplement) {
        (Some((_, base_row)), Some((_, extra_row))) => RequirementMap::merge(base_row, extra_row),
        (Some((_, base_row)), None) => RequirementMap::from_row(base_row),
        (None, Some((_, extra_row))) => RequirementMap::from_row(extra_row),
        (None, None) => {
            tracing::warn!("No daily requirement matches the user attributes");
            return None;
        }
    };

    let resolved = ResolvedRequirement {
        requirements,
        base: base.map(|(idx, row)| RowRef::new(idx, row)),
        supplement: supplement.map(|(idx, row)| RowRef::new(idx, row)),
    };
    tracing::debug!(
        "Resolved requirement from base={:?} supplement={:?}",
        resolved.base,
        resolved.supplement
    );
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientKey;

    const CSV: &str = "\
Kategori,Umur,Satuan,Energi (kkal),Protein (g),Total Lemak (g),Karbohidrat (g),Serat (g),Gula (g),Garam (mg)
Laki-laki,19-29,tahun,2650,65,75,430,37,50,5000
Laki-laki,65-80,tahun,1800,64,45,275,25,50,5000
Laki-laki,80+,tahun,1600,64,40,235,22,50,5000
Perempuan,x-y,tahun,9999,1,1,1,1,1,1
Perempuan,19-29,tahun,2250,60,65,360,32,50,5000
Perempuan,50-64,tahun,1800,60,50,280,25,50,5000
Bayi/Anak,0-5,bulan,550,9,31,59,0,0,120
Bayi/Anak,6-11,bulan,800,15,35,105,11,0,370
Hamil,1,trimester,180,1,\"2,3\",25,0,0,0
Hamil,2,trimester,300,10,\"2,3\",40,4,0,0
Hamil,3,trimester,300,30,\"2,3\",40,4,0,0
Menyusui,1 - 6,bulan,330,20,\"2,2\",45,5,0,0
Menyusui,7 - 12,bulan,400,15,\"2,2\",55,6,0,0
";

    fn table() -> ReferenceTable {
        ReferenceTable::from_csv_str(CSV).unwrap()
    }

    fn adult(gender: &str, age: u32) -> UserAttributes {
        UserAttributes {
            gender: Some(gender.to_string()),
            age: Some(age),
            age_unit: Some(AgeUnit::Year),
            ..Default::default()
        }
    }

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_trimester_buckets() {
        assert_eq!(trimester_for(0), "1");
        assert_eq!(trimester_for(3), "1");
        assert_eq!(trimester_for(4), "2");
        assert_eq!(trimester_for(6), "2");
        assert_eq!(trimester_for(7), "3");
        assert_eq!(trimester_for(40), "3");
    }

    #[test]
    fn test_breastfeeding_buckets() {
        assert_eq!(breastfeeding_period(0), "1-6");
        assert_eq!(breastfeeding_period(6), "1-6");
        assert_eq!(breastfeeding_period(7), "7-12");
    }

    #[test]
    fn test_adult_inside_range_returns_row_unchanged() {
        let table = table();
        let resolved = resolve(&adult("Laki-laki", 25), &table).unwrap();
        let row = &table.rows()[0];
        assert_eq!(resolved.requirements, RequirementMap::from_row(row));
        assert!(approx(resolved.requirements.get(NutrientKey::Energi), 2650.0));
        assert_eq!(resolved.base.unwrap().record, 1);
        assert!(resolved.supplement.is_none());
    }

    #[test]
    fn test_gender_is_case_insensitive() {
        let resolved = resolve(&adult("  PEREMPUAN ", 20), &table()).unwrap();
        assert!(approx(resolved.requirements.get(NutrientKey::Energi), 2250.0));
    }

    #[test]
    fn test_malformed_range_is_skipped() {
        // "x-y" sits before the valid row and must not abort the scan
        let resolved = resolve(&adult("perempuan", 19), &table()).unwrap();
        assert_eq!(resolved.base.unwrap().record, 5);
    }

    #[test]
    fn test_open_ended_range() {
        let resolved = resolve(&adult("laki-laki", 92), &table()).unwrap();
        assert_eq!(resolved.base.unwrap().age, "80+");
    }

    #[test]
    fn test_overlap_takes_first_row_in_table_order() {
        let resolved = resolve(&adult("laki-laki", 80), &table()).unwrap();
        assert_eq!(resolved.base.unwrap().age, "65-80");
    }

    #[test]
    fn test_infant_by_months() {
        let attrs = UserAttributes {
            gender: Some("laki-laki".to_string()),
            age: Some(8),
            age_unit: Some(AgeUnit::Month),
            ..Default::default()
        };
        let resolved = resolve(&attrs, &table()).unwrap();
        assert!(approx(resolved.requirements.get(NutrientKey::Energi), 800.0));
    }

    #[test]
    fn test_trimester_unit_has_no_base_row() {
        let attrs = UserAttributes {
            gender: Some("perempuan".to_string()),
            age: Some(2),
            age_unit: Some(AgeUnit::Trimester),
            ..Default::default()
        };
        assert!(find_base_row(&attrs, &table()).is_none());
        assert!(resolve(&attrs, &table()).is_none());
    }

    #[test]
    fn test_not_found_without_attributes() {
        assert!(resolve(&UserAttributes::default(), &table()).is_none());
    }

    #[test]
    fn test_missing_age_unit_skips_base_lookup() {
        let attrs = UserAttributes {
            gender: Some("perempuan".to_string()),
            age: Some(25),
            ..Default::default()
        };
        assert!(resolve(&attrs, &table()).is_none());
    }

    #[test]
    fn test_pregnancy_adds_supplement() {
        let table = table();
        let base_only = resolve(&adult("perempuan", 25), &table).unwrap();

        let mut attrs = adult("perempuan", 25);
        attrs.is_pregnant = true;
        attrs.gestational_weeks_or_months = Some(5);
        let pregnant = resolve(&attrs, &table).unwrap();

        let supplement_only = resolve(
            &UserAttributes {
                is_pregnant: true,
                gestational_weeks_or_months: Some(5),
                ..Default::default()
            },
            &table,
        )
        .unwrap();

        let expected = base_only.requirements.add(&supplement_only.requirements);
        for key in NutrientKey::ALL {
            assert!(
                approx(pregnant.requirements.get(key), expected.get(key).unwrap()),
                "{}",
                key.as_str()
            );
        }
        assert!(approx(pregnant.requirements.get(NutrientKey::Energi), 2550.0));
        assert!(approx(pregnant.requirements.get(NutrientKey::LemakTotal), 67.3));
        assert_eq!(pregnant.supplement.unwrap().age, "2");
    }

    #[test]
    fn test_supplement_only_when_base_age_missing() {
        // age 30 falls outside every Perempuan row; the trimester row still applies
        let attrs = UserAttributes {
            gender: Some("perempuan".to_string()),
            age: Some(30),
            age_unit: Some(AgeUnit::Year),
            is_pregnant: true,
            gestational_weeks_or_months: Some(5),
            ..Default::default()
        };
        let resolved = resolve(&attrs, &table()).unwrap();
        assert!(resolved.base.is_none());
        assert_eq!(resolved.supplement.as_ref().unwrap().age, "2");
        assert!(approx(resolved.requirements.get(NutrientKey::Energi), 300.0));
        assert!(approx(resolved.requirements.get(NutrientKey::Protein), 10.0));
    }

    #[test]
    fn test_breastfeeding_period_ignores_spacing() {
        let mut attrs = adult("perempuan", 25);
        attrs.is_breastfeeding = true;
        attrs.infant_age_months = Some(9);
        let resolved = resolve(&attrs, &table()).unwrap();
        assert_eq!(resolved.supplement.unwrap().age, "7 - 12");
        assert!(approx(resolved.requirements.get(NutrientKey::Energi), 2650.0));
    }

    #[test]
    fn test_pregnancy_takes_precedence_over_breastfeeding() {
        let mut attrs = adult("perempuan", 25);
        attrs.is_pregnant = true;
        attrs.gestational_weeks_or_months = Some(8);
        attrs.is_breastfeeding = true;
        attrs.infant_age_months = Some(3);
        let resolved = resolve(&attrs, &table()).unwrap();
        let supplement = resolved.supplement.unwrap();
        assert_eq!(supplement.category, "Hamil");
        assert_eq!(supplement.age, "3");
    }

    #[test]
    fn test_pregnant_without_gestation_falls_back_to_breastfeeding() {
        let mut attrs = adult("perempuan", 25);
        attrs.is_pregnant = true;
        attrs.is_breastfeeding = true;
        attrs.infant_age_months = Some(2);
        let resolved = resolve(&attrs, &table()).unwrap();
        assert_eq!(resolved.supplement.unwrap().category, "Menyusui");
    }

    #[test]
    fn test_shipped_dataset_pregnant_adult() {
        let table = ReferenceTable::from_csv_str(include_str!("../../data/nutrition.csv")).unwrap();
        let mut attrs = adult("Perempuan", 30);
        attrs.is_pregnant = true;
        attrs.gestational_weeks_or_months = Some(5);
        let resolved = resolve(&attrs, &table).unwrap();
        assert_eq!(resolved.base.unwrap().age, "30-49");
        assert!(approx(resolved.requirements.get(NutrientKey::Energi), 2450.0));
        assert!(approx(resolved.requirements.get(NutrientKey::Protein), 70.0));
        assert!(approx(resolved.requirements.get(NutrientKey::Gula), 50.0));
    }

    #[test]
    fn test_shipped_dataset_newborn_omits_blank_cells() {
        let table = ReferenceTable::from_csv_str(include_str!("../../data/nutrition.csv")).unwrap();
        let attrs = UserAttributes {
            gender: Some("perempuan".to_string()),
            age: Some(3),
            age_unit: Some(AgeUnit::Month),
            ..Default::default()
        };
        let resolved = resolve(&attrs, &table).unwrap();
        assert_eq!(resolved.requirements.get(NutrientKey::Gula), None);
        assert!(approx(resolved.requirements.get(NutrientKey::Energi), 550.0));
    }
}
