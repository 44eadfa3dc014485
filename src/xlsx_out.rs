use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};

use crate::error::ExtractError;
use crate::model::{NamedTable, TableSet};

/// Excel rejects longer sheet names.
pub const MAX_SHEET_NAME_CHARS: usize = 31;
const MAX_COLUMNS: usize = 16_384;

pub const EMPTY_SHEET_NAME: &str = "Info";
pub const EMPTY_SHEET_MESSAGE: &str = "No tables found";

/// Truncate `name` to the sheet name limit, appending `~N` when the truncated
/// name is already taken.
pub(crate) fn sheet_name(name: &str, taken: &HashSet<String>) -> String {
    let truncated: String = name.chars().take(MAX_SHEET_NAME_CHARS).collect();
    if !taken.contains(&truncated) {
        return truncated;
    }

    (1..)
        .map(|counter| {
            let suffix = format!("~{counter}");
            let keep = MAX_SHEET_NAME_CHARS - suffix.chars().count();
            let stem: String = name.chars().take(keep).collect();
            format!("{stem}{suffix}")
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(truncated)
}

fn row_num(index: usize) -> Result<RowNum, ExtractError> {
    RowNum::try_from(index).map_err(|_| ExtractError::Xlsx(XlsxError::RowColumnLimitError))
}

fn write_table(
    worksheet: &mut Worksheet,
    named: &NamedTable,
    header_format: &Format,
) -> Result<(), ExtractError> {
    let columns = named.table.column_names();
    let width = named.table.width();
    if width > MAX_COLUMNS {
        return Err(ExtractError::TooManyColumns {
            table: named.name.clone(),
            columns: width,
        });
    }

    for (col, title) in (0..).zip(&columns) {
        let col: ColNum = col;
        worksheet.write_string_with_format(0, col, title, header_format)?;
    }

    for (index, row) in named.table.rows.iter().enumerate() {
        let row_index = row_num(index + 1)?;
        for (col, cell) in (0..).zip(row) {
            let col: ColNum = col;
            if let Some(text) = cell {
                worksheet.write_string(row_index, col, text)?;
            }
        }
    }

    Ok(())
}

fn build_workbook(tables: &TableSet) -> Result<Workbook, ExtractError> {
    let mut workbook = Workbook::new();

    if tables.is_empty() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(EMPTY_SHEET_NAME)?;
        worksheet.write_string(0, 0, EMPTY_SHEET_MESSAGE)?;
        return Ok(workbook);
    }

    let header_format = Format::new().set_bold();
    let mut taken = HashSet::new();
    for named in tables {
        let name = sheet_name(&named.name, &taken);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_table(worksheet, named, &header_format)?;
        taken.insert(name);
    }

    Ok(workbook)
}

/// Serialize the tables into an in-memory `.xlsx` workbook.
pub fn write_workbook(tables: &TableSet) -> Result<Vec<u8>, ExtractError> {
    let mut workbook = build_workbook(tables)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_workbook_to_path(tables: &TableSet, path: &Path) -> Result<(), ExtractError> {
    let mut workbook = build_workbook(tables)?;
    workbook.save(path)?;
    Ok(())
}
