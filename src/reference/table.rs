//! Reference table loading and indexing
//!
//! The dataset is read once into memory and partitioned by category and unit.
//! Lookups walk a partition in table order, so "first match wins" keeps the
//! semantics of a linear scan over the file.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::Serialize;
use thiserror::Error;

use crate::models::{AgeUnit, NutrientKey, ReferenceRow};

const CATEGORY_HEADERS: [&str; 2] = ["kategori", "category"];
const AGE_HEADERS: [&str; 2] = ["umur", "age"];
const UNIT_HEADERS: [&str; 2] = ["satuan", "unit"];

/// Reference table error types
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Failed to read reference table '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Reference table has no '{0}' column")]
    MissingColumn(&'static str),
}

/// Result type for reference table operations
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Index key: lowercased category plus unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    pub category: String,
    pub unit: AgeUnit,
}

/// CSV record that could not be decoded at all
#[derive(Debug, Clone, Serialize)]
pub struct UnreadableRecord {
    pub record: u64,
    pub message: String,
}

/// Immutable, indexed snapshot of the reference dataset
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    rows: Vec<ReferenceRow>,
    partitions: HashMap<PartitionKey, Vec<usize>>,
    unreadable: Vec<UnreadableRecord>,
    source: Option<PathBuf>,
}

/// Row count of one partition
#[derive(Debug, Clone, Serialize)]
pub struct PartitionSummary {
    pub category: String,
    pub unit: AgeUnit,
    pub rows: usize,
}

/// Overview of a loaded table
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub source: Option<String>,
    pub total_rows: usize,
    pub indexed_rows: usize,
    pub unreadable_records: usize,
    pub partitions: Vec<PartitionSummary>,
}

struct ColumnLayout {
    category: usize,
    age: usize,
    unit: usize,
    nutrients: Vec<(NutrientKey, usize)>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> ReferenceResult<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };

        let category = find(&CATEGORY_HEADERS).ok_or(ReferenceError::MissingColumn("Kategori"))?;
        let age = find(&AGE_HEADERS).ok_or(ReferenceError::MissingColumn("Umur"))?;
        let unit = find(&UNIT_HEADERS).ok_or(ReferenceError::MissingColumn("Satuan"))?;

        let nutrients = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, h)| NutrientKey::from_column(h).map(|key| (key, idx)))
            .collect();

        Ok(Self {
            category,
            age,
            unit,
            nutrients,
        })
    }

    fn row(&self, record: &csv::StringRecord) -> ReferenceRow {
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        let mut row = ReferenceRow::new(cell(self.category), cell(self.age), cell(self.unit));
        for (key, idx) in &self.nutrients {
            if let Some(value) = record.get(*idx) {
                row.nutrients.insert(*key, value.trim().to_string());
            }
        }
        row
    }
}

impl ReferenceTable {
    /// Build a table from rows already in memory, keeping their order
    pub fn from_rows(rows: Vec<ReferenceRow>) -> Self {
        let mut partitions: HashMap<PartitionKey, Vec<usize>> = HashMap::new();

        for (idx, row) in rows.iter().enumerate() {
            match row.unit() {
                Some(unit) => {
                    let key = PartitionKey {
                        category: row.category_key(),
                        unit,
                    };
                    partitions.entry(key).or_default().push(idx);
                }
                None => {
                    tracing::warn!(
                        "Reference row {} ({}) has unknown unit '{}', not indexed",
                        idx + 1,
                        row.category,
                        row.unit
                    );
                }
            }
        }

        Self {
            rows,
            partitions,
            unreadable: Vec::new(),
            source: None,
        }
    }

    /// Read a CSV dataset with a header row
    pub fn from_reader<R: Read>(reader: R) -> ReferenceResult<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let layout = ColumnLayout::from_headers(rdr.headers()?)?;

        let mut rows = Vec::new();
        let mut unreadable = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record_number = idx as u64 + 1;
            match result {
                Ok(record) => {
                    if record.iter().all(|cell| cell.trim().is_empty()) {
                        continue;
                    }
                    rows.push(layout.row(&record));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable reference record {}: {}", record_number, e);
                    unreadable.push(UnreadableRecord {
                        record: record_number,
                        message: e.to_string(),
                    });
                }
            }
        }

        let mut table = Self::from_rows(rows);
        table.unreadable = unreadable;
        Ok(table)
    }

    pub fn from_csv_str(csv_text: &str) -> ReferenceResult<Self> {
        Self::from_reader(csv_text.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ReferenceResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ReferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut table = Self::from_reader(std::io::BufReader::new(file))?;
        table.source = Some(path.to_path_buf());
        tracing::info!(
            "Loaded {} reference rows ({} partitions) from {}",
            table.rows.len(),
            table.partitions.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn unreadable_records(&self) -> &[UnreadableRecord] {
        &self.unreadable
    }

    /// Rows of one partition in table order, paired with their row index
    pub fn partition(&self, category: &str, unit: AgeUnit) -> impl Iterator<Item = (usize, &ReferenceRow)> + '_ {
        let key = PartitionKey {
            category: category.trim().to_lowercase(),
            unit,
        };
        self.partitions
            .get(&key)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| (idx, &self.rows[idx]))
    }

    /// Rows whose category starts with `prefix` (case-insensitive), in table order
    pub fn with_category_prefix(&self, prefix: &str, unit: AgeUnit) -> Vec<(usize, &ReferenceRow)> {
        let prefix = prefix.trim().to_lowercase();
        let mut indices: Vec<usize> = self
            .partitions
            .iter()
            .filter(|(key, _)| key.unit == unit && key.category.starts_with(&prefix))
            .flat_map(|(_, indices)| indices.iter().copied())
            .collect();
        indices.sort_unstable();
        indices.into_iter().map(|idx| (idx, &self.rows[idx])).collect()
    }

    pub(crate) fn partitions(&self) -> impl Iterator<Item = (&PartitionKey, &[usize])> + '_ {
        self.partitions.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn summary(&self) -> TableSummary {
        let mut partitions: Vec<PartitionSummary> = self
            .partitions
            .iter()
            .map(|(key, indices)| PartitionSummary {
                category: key.category.clone(),
                unit: key.unit,
                rows: indices.len(),
            })
            .collect();
        partitions.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.unit.as_str().cmp(b.unit.as_str()))
        });

        TableSummary {
            source: self.source.as_ref().map(|p| p.display().to_string()),
            total_rows: self.rows.len(),
            indexed_rows: self.partitions.values().map(Vec::len).sum(),
            unreadable_records: self.unreadable.len(),
            partitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Kategori,Umur,Satuan,Energi (kkal),Protein (g),Total Lemak (g),Karbohidrat (g),Serat (g),Gula (g),Garam (mg)
Laki-laki,19-29,tahun,2650,65,75,430,37,50,1500
Perempuan,19-29,tahun,2250,60,65,360,32,50,1500
Hamil,1,trimester,180,1,\"2,3\",25,3,0,0
Bayi/Anak,0-5,bulan,550,9,31,59,0,0,120
Menyusui,1 - 6,bulan,330,20,\"2,2\",45,5,0,0
";

    #[test]
    fn test_load_from_csv() {
        let table = ReferenceTable::from_csv_str(CSV).unwrap();
        assert_eq!(table.len(), 5);
        let row = &table.rows()[2];
        assert_eq!(row.category, "Hamil");
        assert_eq!(row.value(NutrientKey::LemakTotal), 2.3);
    }

    #[test]
    fn test_partition_is_case_insensitive() {
        let table = ReferenceTable::from_csv_str(CSV).unwrap();
        let rows: Vec<_> = table.partition("PEREMPUAN", AgeUnit::Year).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 1);
        assert_eq!(table.partition("perempuan", AgeUnit::Month).count(), 0);
    }

    #[test]
    fn test_english_headers_accepted() {
        let csv = "Category,Age,Unit,Energi (kkal)\nPerempuan,19-29,year,2250\n";
        let table = ReferenceTable::from_csv_str(csv).unwrap();
        assert_eq!(table.partition("perempuan", AgeUnit::Year).count(), 1);
        assert_eq!(table.rows()[0].raw_value(NutrientKey::Protein), None);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let result = ReferenceTable::from_csv_str("Kategori,Umur\nPerempuan,19-29\n");
        assert!(matches!(result, Err(ReferenceError::MissingColumn("Satuan"))));
    }

    #[test]
    fn test_unknown_unit_is_kept_but_not_indexed() {
        let csv = "Kategori,Umur,Satuan\nPerempuan,19-29,minggu\nPerempuan,30-49,tahun\n";
        let table = ReferenceTable::from_csv_str(csv).unwrap();
        assert_eq!(table.len(), 2);
        let summary = table.summary();
        assert_eq!(summary.indexed_rows, 1);
    }

    #[test]
    fn test_prefix_lookup_keeps_table_order() {
        let csv = "\
Kategori,Umur,Satuan
Hamil Trimester,2,trimester
Hamil,1,trimester
Hamil,2,trimester
";
        let table = ReferenceTable::from_csv_str(csv).unwrap();
        let indices: Vec<usize> = table
            .with_category_prefix("hamil", AgeUnit::Trimester)
            .into_iter()
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let csv = "Kategori,Umur,Satuan\n,,\nPerempuan,19-29,tahun\n";
        let table = ReferenceTable::from_csv_str(csv).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = ReferenceTable::from_path("/nonexistent/nutrition.csv");
        assert!(matches!(result, Err(ReferenceError::Io { .. })));
    }
}
