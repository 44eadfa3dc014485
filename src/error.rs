use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF has no extractable text; scanned or image-only documents are not supported")]
    NotSearchable,

    #[error("no pages available after applying selection")]
    NoPagesSelected,

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("table '{table}' has {columns} columns, more than a worksheet can hold")]
    TooManyColumns { table: String, columns: usize },
}
