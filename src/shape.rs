use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::{Cell, NamedTable, PageTables, RawTable, ShapedTable, TableSet};

pub(crate) const UNNAMED_COLUMN: &str = "Unnamed";

/// Sheet-friendly name for the `table_index`-th table on `page_number`.
#[must_use]
pub fn table_name(page_number: u32, table_index: usize) -> String {
    format!("Page {page_number} - Table {table_index}")
}

/// Turn a header row into unique column names.
///
/// Blank or absent cells become `Unnamed`. A repeated name gets `.1`, `.2`,
/// ... in order of repetition, skipping any suffixed name the row already uses.
#[must_use]
pub fn sanitize_header(cells: &[Cell]) -> Vec<String> {
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(cells.len());

    for cell in cells {
        let base = cell
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(UNNAMED_COLUMN)
            .to_string();

        let name = if used.contains(&base) {
            let counter = repeats.entry(base.clone()).or_insert(0);
            loop {
                *counter += 1;
                let candidate = format!("{base}.{counter}");
                if !used.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            base
        };

        used.insert(name.clone());
        names.push(name);
    }

    names
}

fn shape_table(raw: &RawTable) -> Option<ShapedTable> {
    let table = match raw.split_first() {
        None => return None,
        Some((only, [])) => ShapedTable {
            header: None,
            rows: vec![only.clone()],
        },
        Some((header, data)) => ShapedTable {
            header: Some(sanitize_header(header)),
            rows: data.to_vec(),
        },
    };

    (!table.is_empty()).then_some(table)
}

/// Shape every raw table into a named table, in page then detection order.
///
/// Tables are numbered per page starting at 1; tables that turn out empty are
/// dropped but still consume their number.
#[must_use]
pub fn shape_tables(pages: &[PageTables]) -> TableSet {
    let mut set = TableSet::default();

    for page in pages {
        for (offset, raw) in page.tables.iter().enumerate() {
            let table_index = offset + 1;
            let Some(table) = shape_table(raw) else {
                debug!(page = page.page_number, table_index, "skipping empty table");
                continue;
            };

            set.push(NamedTable {
                name: table_name(page.page_number, table_index),
                page_number: page.page_number,
                table_index,
                table,
            });
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::{sanitize_header, shape_tables, table_name};
    use crate::model::{Cell, PageTables, RawTable};

    fn cells(values: &[Option<&str>]) -> Vec<Cell> {
        values.iter().map(|value| value.map(str::to_string)).collect()
    }

    fn text_row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|value| Some((*value).to_string())).collect()
    }

    #[test]
    fn disambiguates_blank_and_repeated_headers() {
        let header = cells(&[Some("A"), Some(""), Some("A"), None]);
        assert_eq!(
            sanitize_header(&header),
            vec!["A", "Unnamed", "A.1", "Unnamed.1"]
        );
    }

    #[test]
    fn counts_repeats_per_base_name() {
        let header = cells(&[Some("x"), Some(" x "), Some("y"), Some("x"), Some("y")]);
        assert_eq!(sanitize_header(&header), vec!["x", "x.1", "y", "x.2", "y.1"]);
    }

    #[test]
    fn skips_suffixes_already_present() {
        let header = cells(&[Some("A"), Some("A.1"), Some("A"), Some("A.1")]);
        let names = sanitize_header(&header);
        assert_eq!(names, vec!["A", "A.1", "A.2", "A.1.1"]);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn drops_tables_without_rows() {
        let pages = vec![PageTables {
            page_number: 1,
            tables: vec![RawTable::new()],
        }];
        assert!(shape_tables(&pages).is_empty());
    }

    #[test]
    fn single_row_table_has_no_header() {
        let pages = vec![PageTables {
            page_number: 3,
            tables: vec![vec![text_row(&["a", "a", "b"])]],
        }];

        let set = shape_tables(&pages);
        let table = set.get("Page 3 - Table 1").expect("table should be kept");
        assert_eq!(table.header, None);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.column_names(), vec!["col_1", "col_2", "col_3"]);
    }

    #[test]
    fn numbers_tables_per_page_and_keeps_ordinals_of_skipped_tables() {
        let pages = vec![
            PageTables {
                page_number: 2,
                tables: vec![
                    RawTable::new(),
                    vec![text_row(&["h"]), text_row(&["v"])],
                ],
            },
            PageTables {
                page_number: 5,
                tables: vec![vec![text_row(&["h"]), text_row(&["v"])]],
            },
        ];

        let set = shape_tables(&pages);
        assert_eq!(set.names(), vec!["Page 2 - Table 2", "Page 5 - Table 1"]);
    }

    #[test]
    fn shapes_header_and_data_rows_for_first_page_only() {
        let pages = vec![
            PageTables {
                page_number: 1,
                tables: vec![vec![
                    text_row(&["Name", "Score", "Score"]),
                    text_row(&["Alice", "9", "8"]),
                    text_row(&["Bob", "7"]),
                ]],
            },
            PageTables {
                page_number: 2,
                tables: Vec::new(),
            },
        ];

        let set = shape_tables(&pages);
        assert_eq!(set.len(), 1);
        let table = set.get(&table_name(1, 1)).expect("page 1 table");
        assert_eq!(
            table.header.as_deref(),
            Some(&["Name".to_string(), "Score".to_string(), "Score.1".to_string()][..])
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], text_row(&["Bob", "7"]));
    }

    #[test]
    fn drops_tables_with_no_columns() {
        let pages = vec![PageTables {
            page_number: 1,
            tables: vec![vec![Vec::new()], vec![Vec::new(), Vec::new()]],
        }];
        assert!(shape_tables(&pages).is_empty());
    }
}
