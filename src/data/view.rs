use super::filter::FilterState;
use super::model::{ColumnId, Dataset, Row};
use super::sort::{order_for, SortDirective, SortOrder};

/// Everything the table widget needs to draw one column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor<'a> {
    pub id: &'a ColumnId,
    /// Filter choices, distinct values in first-seen order.
    pub choices: &'a [String],
    pub selected: Option<&'a str>,
    pub sort: Option<SortOrder>,
}

/// Render model: ordered columns plus the visible rows in display order.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub columns: Vec<ColumnDescriptor<'a>>,
    pub rows: Vec<&'a Row>,
}

/// Build the render model from the dataset and the current selections.
/// `visible` holds row indices already filtered and sorted.
pub fn table_view<'a>(
    dataset: &'a Dataset,
    visible: &[usize],
    filters: &'a FilterState,
    sort: Option<&SortDirective>,
) -> TableView<'a> {
    let columns = dataset
        .columns
        .iter()
        .map(|id| ColumnDescriptor {
            id,
            choices: dataset.distinct_values(id),
            selected: filters.get(id),
            sort: order_for(sort, id),
        })
        .collect();
    let rows = visible.iter().map(|&i| &dataset.rows[i]).collect();
    TableView { columns, rows }
}

/// Header suffix marking the sorted column.
pub fn sort_indicator(order: Option<SortOrder>) -> &'static str {
    match order {
        Some(SortOrder::Ascending) => " ▲",
        Some(SortOrder::Descending) => " ▼",
        None => "",
    }
}

/// Text shown for `column` in `row`; a missing cell renders blank.
pub fn cell_text<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_rows(vec![
            Row::from_pairs([("Quarter", "1"), ("Play", "Run")]),
            Row::from_pairs([("Quarter", "2"), ("Play", "Pass")]),
            Row::from_pairs([("Quarter", "1")]),
        ])
    }

    #[test]
    fn descriptors_carry_choices_selection_and_sort() {
        let ds = dataset();
        let filters = FilterState::default().with_filter("Quarter", "1");
        let sort = SortDirective::descending("Play");
        let view = table_view(&ds, &[2, 0], &filters, Some(&sort));

        assert_eq!(view.columns.len(), 2);
        let quarter = &view.columns[0];
        assert_eq!(&**quarter.id, "Quarter");
        assert_eq!(quarter.choices, ["1", "2"]);
        assert_eq!(quarter.selected, Some("1"));
        assert_eq!(quarter.sort, None);

        let play = &view.columns[1];
        assert_eq!(play.selected, None);
        assert_eq!(play.sort, Some(SortOrder::Descending));

        assert_eq!(view.rows.len(), 2);
        assert!(std::ptr::eq(view.rows[0], &ds.rows[2]));
    }

    #[test]
    fn empty_dataset_renders_nothing() {
        let ds = Dataset::from_rows(Vec::new());
        let filters = FilterState::default();
        let view = table_view(&ds, &[], &filters, None);
        assert!(view.columns.is_empty());
        assert!(view.rows.is_empty());
    }

    #[test]
    fn missing_cells_render_blank() {
        let ds = dataset();
        assert_eq!(cell_text(&ds.rows[2], "Play"), "");
        assert_eq!(cell_text(&ds.rows[0], "Play"), "Run");
    }

    #[test]
    fn indicator_follows_order() {
        assert_eq!(sort_indicator(None), "");
        assert_eq!(sort_indicator(Some(SortOrder::Ascending)), " ▲");
        assert_eq!(sort_indicator(Some(SortOrder::Descending)), " ▼");
    }
}
