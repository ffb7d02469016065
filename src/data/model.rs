use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::schema::{distinct_values, infer_schema};

/// Column identifier. Shared between every row that carries the column so a
/// large dataset holds one allocation per header, not one per cell.
pub type ColumnId = Arc<str>;

// ---------------------------------------------------------------------------
// Header – column layout shared by the rows of one source
// ---------------------------------------------------------------------------

/// Unique column identifiers in first-seen order, with a name → position index.
///
/// Every row parsed from one file points at the same `Arc<Header>`, so the
/// layout is built (and duplicate names resolved) once per file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Header {
    columns: Vec<ColumnId>,
    index: HashMap<ColumnId, usize>,
}

impl Header {
    /// Build a header from raw names. A repeated name keeps its first position.
    pub fn new<K: Into<ColumnId>>(names: impl IntoIterator<Item = K>) -> Self {
        let mut header = Header::default();
        for name in names {
            let name = name.into();
            if !header.index.contains_key(&name) {
                header.index.insert(name.clone(), header.columns.len());
                header.columns.push(name);
            }
        }
        header
    }

    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    /// Position of `column` within the header.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the source file
// ---------------------------------------------------------------------------

/// A single record: values laid out by a shared [`Header`].
///
/// `values[i]` belongs to `header.columns()[i]`. A row may be shorter than
/// its header, in which case it lacks the trailing columns. Rows are built
/// once by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    header: Arc<Header>,
    values: Vec<String>,
}

impl Row {
    /// Row laid out by `header`. Values beyond the header's width are dropped.
    pub fn new(header: Arc<Header>, mut values: Vec<String>) -> Self {
        values.truncate(header.columns.len());
        Row { header, values }
    }

    /// Build a row (with its own header) from `(column, value)` pairs.
    ///
    /// A repeated column keeps its first position but takes the later value,
    /// the same as inserting twice into a map.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<ColumnId>,
        V: Into<String>,
    {
        let pairs: Vec<(ColumnId, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let header = Header::new(pairs.iter().map(|(k, _)| k.clone()));
        let mut values = vec![String::new(); header.columns.len()];
        for (key, value) in pairs {
            if let Some(i) = header.position(&key) {
                values[i] = value;
            }
        }
        Row {
            header: Arc::new(header),
            values,
        }
    }

    /// Cell value for `column`, or `None` when this row lacks the key.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.at(self.header.position(column)?)
    }

    fn at(&self, position: usize) -> Option<&str> {
        self.values.get(position).map(String::as_str)
    }

    /// Column identifiers in header order.
    pub fn keys(&self) -> impl Iterator<Item = &ColumnId> {
        self.header.columns()[..self.values.len()].iter()
    }
}

/// Reads one column across many rows, resolving its position once per
/// distinct header instead of once per row.
pub struct ColumnLookup<'c> {
    column: &'c str,
    cached: Option<(Arc<Header>, Option<usize>)>,
}

impl<'c> ColumnLookup<'c> {
    pub fn new(column: &'c str) -> Self {
        ColumnLookup {
            column,
            cached: None,
        }
    }

    /// Same as [`Row::get`] for the looked-up column.
    pub fn get<'r>(&mut self, row: &'r Row) -> Option<&'r str> {
        let hit = matches!(&self.cached, Some((h, _)) if Arc::ptr_eq(h, &row.header));
        if !hit {
            let position = row.header.position(self.column);
            self.cached = Some((Arc::clone(&row.header), position));
        }
        self.cached
            .as_ref()
            .and_then(|(_, position)| *position)
            .and_then(|i| row.at(i))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with its derived schema and per-column choices.
///
/// A `Dataset` is immutable: loading a new file builds a new one, which is
/// when `columns` and `distinct` get recomputed.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All rows, in source order.
    pub rows: Vec<Row>,
    /// Ordered column identifiers (keys of the first row).
    pub columns: Vec<ColumnId>,
    /// For each column, its distinct values in first-seen order.
    pub distinct: BTreeMap<ColumnId, Vec<String>>,
}

impl Dataset {
    /// Build the schema and distinct-value index from parsed rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = infer_schema(&rows);
        let distinct = columns
            .iter()
            .map(|col| (col.clone(), distinct_values(&rows, col)))
            .collect();
        Dataset {
            rows,
            columns,
            distinct,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct values observed for `column` (empty for unknown columns).
    pub fn distinct_values(&self, column: &str) -> &[String] {
        self.distinct.get(column).map(Vec::as_slice).unwrap_or(&[])
    }
}
