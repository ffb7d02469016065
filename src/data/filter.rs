use std::collections::BTreeMap;

use super::model::{ColumnId, ColumnLookup, Row};

// ---------------------------------------------------------------------------
// Filter store: at most one selected value per column
// ---------------------------------------------------------------------------

/// Per-column selection state: column → the single value rows must equal.
/// A column absent from the map is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected: BTreeMap<ColumnId, String>,
}

impl FilterState {
    /// Currently selected value for `column`, if constrained.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.selected.get(column).map(String::as_str)
    }

    /// Constrain `column` to `value`. An empty `value` clears the constraint
    /// instead of matching the literal empty string.
    ///
    /// The value is not checked against the column's observed values; an
    /// unknown one is legal and simply matches nothing.
    pub fn set(&mut self, column: impl Into<ColumnId>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        if value.is_empty() {
            self.selected.remove(&column);
        } else {
            self.selected.insert(column, value);
        }
    }

    /// Copy of this state with `column` set to `value` (see [`FilterState::set`]).
    pub fn with_filter(&self, column: impl Into<ColumnId>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.set(column, value);
        next
    }

    /// Number of constrained columns.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterate over `(column, value)` constraints.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selected.iter().map(|(c, v)| (&**c, v.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// The active constraints, each resolved against the rows' layout.
struct Matcher<'f> {
    constraints: Vec<(ColumnLookup<'f>, &'f str)>,
}

impl<'f> Matcher<'f> {
    fn new(filters: &'f FilterState) -> Self {
        Matcher {
            constraints: filters
                .iter()
                .map(|(col, wanted)| (ColumnLookup::new(col), wanted))
                .collect(),
        }
    }

    /// Exact string equality on every constraint: no trimming, case folding
    /// or numeric coercion. A row lacking a constrained column fails it.
    fn matches(&mut self, row: &Row) -> bool {
        self.constraints
            .iter_mut()
            .all(|(lookup, wanted)| lookup.get(row) == Some(*wanted))
    }
}

/// Indices of rows passing all active filters, in dataset order.
///
/// This is the visible-row sequence before sorting.
pub fn filtered_indices(rows: &[Row], filters: &FilterState) -> Vec<usize> {
    if filters.is_empty() {
        return (0..rows.len()).collect();
    }
    let mut matcher = Matcher::new(filters);
    rows.iter()
        .enumerate()
        .filter(|(_, row)| matcher.matches(row))
        .map(|(i, _)| i)
        .collect()
}
