use serde::Serialize;

/// A single table cell; `None` when the detector found no value.
pub type Cell = Option<String>;

pub type RawTable = Vec<Vec<Cell>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Raw tables detected on one page, keyed by the 1-based page number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageTables {
    pub page_number: u32,
    pub tables: Vec<RawTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapedTable {
    /// Sanitized, unique column names. `None` for headerless tables.
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<Cell>>,
}

impl ShapedTable {
    /// Widest of the header and every data row.
    #[must_use]
    pub fn width(&self) -> usize {
        let header_width = self.header.as_ref().map_or(0, Vec::len);
        self.rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(header_width)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width() == 0
    }

    /// Header names used for export: the sanitized header, or positional
    /// `col_N` names when the table has none.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        match &self.header {
            Some(header) => header.clone(),
            None => (1..=self.width()).map(|index| format!("col_{index}")).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedTable {
    pub name: String,
    pub page_number: u32,
    pub table_index: usize,
    pub table: ShapedTable,
}

/// Shaped tables in extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TableSet {
    tables: Vec<NamedTable>,
}

impl TableSet {
    pub(crate) fn push(&mut self, table: NamedTable) {
        self.tables.push(table);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ShapedTable> {
        self.tables
            .iter()
            .find(|named| named.name == name)
            .map(|named| &named.table)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|named| named.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedTable> {
        self.tables.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|named| named.table.rows.len()).sum()
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a NamedTable;
    type IntoIter = std::slice::Iter<'a, NamedTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
