mod error;
mod model;
mod options;
mod pdf_reader;
mod shape;
mod table_detect;
mod table_parse;
mod xlsx_out;

use std::path::Path;

use tracing::{debug, info};

pub use error::ExtractError;
pub use model::{Cell, NamedTable, PageTables, RawTable, ShapedTable, TableSet};
pub use options::{ExtractOptions, PageScope, PageSelection, parse_selection};
pub use pdf_reader::{PdfDocument, SEARCHABLE_CHECK_PAGES};
pub use shape::{sanitize_header, shape_tables, table_name};
pub use xlsx_out::{
    EMPTY_SHEET_MESSAGE, EMPTY_SHEET_NAME, MAX_SHEET_NAME_CHARS, write_workbook,
    write_workbook_to_path,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub page_count: usize,
    pub pages_processed: usize,
    pub table_count: usize,
    pub row_count: usize,
}

fn validate_options(options: &ExtractOptions) -> Result<(), ExtractError> {
    if options.min_cols < 2 {
        return Err(ExtractError::InvalidOption(
            "min_cols must be at least 2".to_string(),
        ));
    }
    Ok(())
}

/// Detect and shape the tables on the pages selected by `options`.
pub fn extract_tables(
    document: &PdfDocument,
    options: &ExtractOptions,
) -> Result<TableSet, ExtractError> {
    Ok(extract_with_report(document, options)?.0)
}

fn extract_with_report(
    document: &PdfDocument,
    options: &ExtractOptions,
) -> Result<(TableSet, ExtractionReport), ExtractError> {
    validate_options(options)?;

    if options.require_text && !document.is_searchable() {
        return Err(ExtractError::NotSearchable);
    }

    let page_count = document.page_count();
    let indices = options.scope.resolve(page_count);
    if indices.is_empty() && matches!(options.scope, PageScope::Selected(_)) {
        return Err(ExtractError::NoPagesSelected);
    }

    let pages = indices
        .iter()
        .map(|&index| document.page_tables(index, options.min_cols))
        .collect::<Vec<_>>();
    debug!(
        raw_tables = pages.iter().map(|page| page.tables.len()).sum::<usize>(),
        "collected raw tables"
    );

    let tables = shape_tables(&pages);
    let report = ExtractionReport {
        page_count,
        pages_processed: indices.len(),
        table_count: tables.len(),
        row_count: tables.row_count(),
    };
    info!(
        pages = report.pages_processed,
        tables = report.table_count,
        rows = report.row_count,
        "extraction finished"
    );

    Ok((tables, report))
}

pub fn extract_pdf_to_xlsx(
    input_pdf: &Path,
    output_xlsx: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionReport, ExtractError> {
    validate_options(options)?;
    let document = PdfDocument::open(input_pdf)?;
    let (tables, report) = extract_with_report(&document, options)?;
    write_workbook_to_path(&tables, output_xlsx)?;
    Ok(report)
}

pub fn extract_pdf_bytes_to_xlsx(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<(Vec<u8>, ExtractionReport), ExtractError> {
    validate_options(options)?;
    let document = PdfDocument::from_bytes(input_pdf)?;
    let (tables, report) = extract_with_report(&document, options)?;
    let workbook = write_workbook(&tables)?;
    Ok((workbook, report))
}
