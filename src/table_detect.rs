use tracing::debug;

use crate::model::{PageTables, PageText, RawTable};
use crate::table_parse::row_cells;

/// Detect tables as runs of consecutive tabular lines.
///
/// A run needs at least two rows; a single tabular line surrounded by prose
/// is more likely a caption or a label than a table.
pub(crate) fn detect_tables_in_page(page: &PageText, min_cols: usize) -> PageTables {
    let mut tables = Vec::new();
    let mut current: RawTable = Vec::new();

    let flush = |current: &mut RawTable, tables: &mut Vec<RawTable>| {
        if current.len() >= 2 {
            tables.push(std::mem::take(current));
        } else {
            current.clear();
        }
    };

    for line in page.text.lines() {
        let cells = row_cells(line, min_cols);
        if cells.len() >= min_cols {
            current.push(cells.into_iter().map(Some).collect());
        } else {
            flush(&mut current, &mut tables);
        }
    }
    flush(&mut current, &mut tables);

    debug!(
        page = page.page_number,
        tables = tables.len(),
        "detected tables"
    );

    PageTables {
        page_number: page.page_number,
        tables,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::detect_tables_in_page;
    use crate::model::PageText;

    fn page(lines: &[&str]) -> PageText {
        PageText {
            page_number: 4,
            text: lines.join("\n"),
        }
    }

    #[test]
    fn finds_separate_tables_split_by_prose() {
        let detected = detect_tables_in_page(
            &page(&[
                "Quarterly report.",
                "Region  Sales  Growth",
                "North  120  4%",
                "South  98  2%",
                "",
                "Notes follow below.",
                "Item  Qty",
                "Pen  3",
            ]),
            2,
        );

        assert_eq!(detected.page_number, 4);
        assert_eq!(detected.tables.len(), 2);
        assert_eq!(detected.tables[0].len(), 3);
        assert_eq!(
            detected.tables[1][1],
            vec![Some("Pen".to_string()), Some("3".to_string())]
        );
    }

    #[test]
    fn ignores_lone_tabular_line() {
        let detected = detect_tables_in_page(&page(&["Total  42", "That is all."]), 2);
        assert!(detected.tables.is_empty());
    }

    #[test]
    fn respects_minimum_column_count() {
        let lines = ["Name  Age", "Alice  30", "Bob  22"];
        assert_eq!(detect_tables_in_page(&page(&lines), 2).tables.len(), 1);
        assert!(detect_tables_in_page(&page(&lines), 3).tables.is_empty());
    }
}
