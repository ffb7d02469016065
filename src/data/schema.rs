use std::collections::HashSet;

use super::model::{ColumnId, ColumnLookup, Row};

/// Ordered column identifiers for a set of rows.
///
/// The first row's keys define the schema. Later rows are not consulted; use
/// [`schema_drift`] to find the ones that disagree.
pub fn infer_schema(rows: &[Row]) -> Vec<ColumnId> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Distinct values of `column` in first-seen order.
///
/// Rows lacking the column contribute nothing.
pub fn distinct_values(rows: &[Row], column: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut lookup = ColumnLookup::new(column);
    rows.iter()
        .filter_map(|row| lookup.get(row))
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// A row whose key set differs from the inferred schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDrift {
    /// Zero-based row index within the dataset.
    pub row: usize,
    /// Schema columns the row lacks.
    pub missing: Vec<ColumnId>,
    /// Keys the row carries that the schema does not.
    pub extra: Vec<ColumnId>,
}

/// Report every row whose keys do not match `schema`.
pub fn schema_drift(rows: &[Row], schema: &[ColumnId]) -> Vec<SchemaDrift> {
    let known: HashSet<&str> = schema.iter().map(|c| &**c).collect();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| !row.keys().eq(schema.iter()))
        .filter_map(|(i, row)| {
            let missing: Vec<ColumnId> = schema
                .iter()
                .filter(|col| row.get(col).is_none())
                .cloned()
                .collect();
            let extra: Vec<ColumnId> = row
                .keys()
                .filter(|&key| !known.contains(&**key))
                .cloned()
                .collect();
            if missing.is_empty() && extra.is_empty() {
                None
            } else {
                Some(SchemaDrift {
                    row: i,
                    missing,
                    extra,
                })
            }
        })
        .collect()
}
