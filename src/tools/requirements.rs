//! Daily requirement tools

use serde::Serialize;

use crate::models::{RequirementMap, UserAttributes};
use crate::nutrition::{resolve, RowRef};
use crate::reference::ReferenceTable;

/// Message returned when no reference row matches the user
pub const REQUIREMENT_NOT_FOUND: &str = "Kebutuhan harian tidak ditemukan untuk data user ini.";

/// Response for get_daily_requirements
#[derive(Debug, Serialize)]
pub struct DailyRequirementsResponse {
    pub kebutuhan_harian: RequirementMap,
    pub base: Option<RowRef>,
    pub supplement: Option<RowRef>,
}

/// Response when the requirement cannot be resolved
#[derive(Debug, Serialize)]
pub struct RequirementNotFoundResponse {
    pub error: &'static str,
}

impl Default for RequirementNotFoundResponse {
    fn default() -> Self {
        Self {
            error: REQUIREMENT_NOT_FOUND,
        }
    }
}

pub fn get_daily_requirements(
    table: &ReferenceTable,
    attrs: &UserAttributes,
) -> Option<DailyRequirementsResponse> {
    resolve(attrs, table).map(|resolved| DailyRequirementsResponse {
        kebutuhan_harian: resolved.requirements,
        base: resolved.base,
        supplement: resolved.supplement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgeUnit;

    #[test]
    fn test_response_shape() {
        let table = ReferenceTable::from_csv_str(
            "Kategori,Umur,Satuan,Energi (kkal),Total Lemak (g)\nPerempuan,19-29,tahun,2250,\"65,5\"\n",
        )
        .unwrap();
        let attrs = UserAttributes {
            gender: Some("perempuan".to_string()),
            age: Some(22),
            age_unit: Some(AgeUnit::Year),
            ..Default::default()
        };
        let response = get_daily_requirements(&table, &attrs).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json["kebutuhan_harian"],
            serde_json::json!({"energi": 2250.0, "lemak total": 65.5})
        );
        assert_eq!(json["base"]["record"], 1);
        assert!(json["supplement"].is_null());
    }

    #[test]
    fn test_not_found() {
        let table = ReferenceTable::default();
        assert!(get_daily_requirements(&table, &UserAttributes::default()).is_none());
        let json = serde_json::to_value(RequirementNotFoundResponse::default()).unwrap();
        assert_eq!(json["error"], REQUIREMENT_NOT_FOUND);
    }
}
