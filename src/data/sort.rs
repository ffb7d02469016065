use std::cmp::Ordering;

use super::model::{ColumnId, ColumnLookup, Row};

/// Sort order specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (smallest first)
    Ascending,
    /// Descending order (largest first)
    Descending,
}

/// The single active sort: one column and its order.
///
/// "No sort" is represented by the absence of a directive
/// (`Option<SortDirective>`), in which case rows keep their incoming order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub column: ColumnId,
    pub order: SortOrder,
}

impl SortDirective {
    pub fn ascending(column: impl Into<ColumnId>) -> Self {
        SortDirective {
            column: column.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(column: impl Into<ColumnId>) -> Self {
        SortDirective {
            column: column.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Next directive after the user clicks `column`'s header.
///
/// A new column starts ascending; repeated clicks on the same column cycle
/// ascending → descending → unsorted.
pub fn toggle_sort(current: Option<&SortDirective>, column: &str) -> Option<SortDirective> {
    match current {
        Some(d) if &*d.column == column => match d.order {
            SortOrder::Ascending => Some(SortDirective::descending(d.column.clone())),
            SortOrder::Descending => None,
        },
        _ => Some(SortDirective::ascending(column)),
    }
}

/// Sort order currently shown for `column`, if it is the sorted one.
pub fn order_for(current: Option<&SortDirective>, column: &str) -> Option<SortOrder> {
    current
        .filter(|d| &*d.column == column)
        .map(|d| d.order)
}

/// Compare two cells of the sorted column.
///
/// Cells compare as raw strings. A missing cell sorts after every present
/// one, in either order.
pub fn compare_cells(a: Option<&str>, b: Option<&str>, order: SortOrder) -> Ordering {
    let base_cmp = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(x), Some(y)) => x.cmp(y),
    };
    match order {
        SortOrder::Ascending => base_cmp,
        SortOrder::Descending => base_cmp.reverse(),
    }
}

/// Reorder `indices` (positions into `rows`) per `directive`. Without a
/// directive the incoming order is kept.
///
/// The sort is stable: rows with equal keys keep their relative input order.
/// Each row's key is read once up front, not per comparison.
pub fn sort_indices(rows: &[Row], indices: &mut [usize], directive: Option<&SortDirective>) {
    let Some(d) = directive else {
        return;
    };
    let mut lookup = ColumnLookup::new(&d.column);
    let mut keyed: Vec<(Option<&str>, usize)> = indices
        .iter()
        .map(|&i| (lookup.get(&rows[i]), i))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_cells(*a, *b, d.order));
    for (slot, (_, i)) in indices.iter_mut().zip(keyed) {
        *slot = i;
    }
}
