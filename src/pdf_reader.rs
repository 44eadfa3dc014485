use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::Path;

use encoding_rs::{BIG5, GBK, SHIFT_JIS, UTF_16BE};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::model::{PageTables, PageText};
use crate::table_detect::detect_tables_in_page;
use crate::table_parse::row_cells;

/// Number of leading pages inspected when deciding whether a PDF has text.
pub const SEARCHABLE_CHECK_PAGES: usize = 3;

/// A loaded PDF with per-page text extraction. Page text is extracted once
/// and reused by the searchable check and table detection.
pub struct PdfDocument {
    document: Document,
    pages: Vec<(u32, ObjectId)>,
    layout_pages: Option<Vec<String>>,
    texts: Vec<OnceCell<Option<String>>>,
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        let document = Document::load_mem(bytes)?;
        let layout_text = pdf_extract::extract_text_from_mem(bytes).ok();
        Ok(Self::new(document, layout_text.as_deref()))
    }

    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let document = Document::load(path)?;
        let layout_text = pdf_extract::extract_text(path).ok();
        Ok(Self::new(document, layout_text.as_deref()))
    }

    fn new(document: Document, layout_text: Option<&str>) -> Self {
        let pages = document.get_pages().into_iter().collect::<Vec<_>>();
        let layout_pages = layout_text
            .map(split_form_feeds)
            .filter(|split| split.len() == pages.len());
        if layout_text.is_some() && layout_pages.is_none() {
            debug!("layout text does not split into pages; using content streams only");
        }

        let texts = pages.iter().map(|_| OnceCell::new()).collect();
        Self {
            document,
            pages,
            layout_pages,
            texts,
        }
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Best-effort text of the page at a 0-based index, or `None` when the
    /// page has no extractable text.
    #[must_use]
    pub fn page_text(&self, index: usize) -> Option<String> {
        self.cached_text(index).map(str::to_string)
    }

    fn cached_text(&self, index: usize) -> Option<&str> {
        self.texts
            .get(index)?
            .get_or_init(|| self.extract_page_text(index))
            .as_deref()
    }

    fn extract_page_text(&self, index: usize) -> Option<String> {
        let &(page_number, page_id) = self.pages.get(index)?;

        let mut candidates = Vec::new();
        if let Some(text) = self.layout_pages.as_ref().and_then(|pages| pages.get(index)) {
            candidates.push(text.clone());
        }
        if let Some(text) = content_stream_text(&self.document, page_id) {
            candidates.push(text);
        }
        if let Ok(text) = self.document.extract_text(&[page_number]) {
            candidates.push(text);
        }

        candidates
            .into_iter()
            .filter(|text| !text.trim().is_empty())
            .max_by_key(|text| tabular_score(text))
    }

    /// Whether any of the first few pages carries text. Scanned documents
    /// usually have none.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        (0..self.page_count().min(SEARCHABLE_CHECK_PAGES))
            .any(|index| self.cached_text(index).is_some())
    }

    /// Raw tables on the page at a 0-based index.
    #[must_use]
    pub fn page_tables(&self, index: usize, min_cols: usize) -> PageTables {
        let Some(&(page_number, _)) = self.pages.get(index) else {
            return PageTables::default();
        };

        match self.cached_text(index) {
            Some(text) => {
                let page = PageText {
                    page_number,
                    text: text.to_string(),
                };
                detect_tables_in_page(&page, min_cols)
            }
            None => {
                warn!(page = page_number, "page has no extractable text");
                PageTables {
                    page_number,
                    tables: Vec::new(),
                }
            }
        }
    }
}

fn split_form_feeds(text: &str) -> Vec<String> {
    let mut pages = text.split('\u{000C}').map(str::to_string).collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_garbled(text: &str) -> bool {
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    if total == 0 {
        return false;
    }

    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|&ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();

    replacement * 8 > total || control * 5 > total
}

fn decode_text_operand(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_garbled(&decoded) {
        return decoded;
    }

    let utf16 = |bytes: &[u8]| {
        let (text, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
        (!had_errors && !text.is_empty()).then(|| text.into_owned())
    };

    if let Some(body) = bytes.strip_prefix(&[0xFE_u8, 0xFF]) {
        if let Some(text) = utf16(body) {
            return text;
        }
    }

    if let Some(name) = encoding.map(str::to_ascii_lowercase) {
        if ["utf16", "ucs2", "identity-h", "unicode"]
            .iter()
            .any(|hint| name.contains(hint))
        {
            if let Some(text) = utf16(bytes) {
                return text;
            }
        }

        let legacy = if name.contains("big5") || name.contains("b5") || name.contains("eten") {
            Some(BIG5)
        } else if name.contains("gbk") || name.contains("gb-") || name.contains("gb2312") {
            Some(GBK)
        } else if name.contains("rksj") || name.contains("shift") {
            Some(SHIFT_JIS)
        } else {
            None
        };
        if let Some(fallback) = legacy {
            let (text, _, had_errors) = fallback.decode(bytes);
            if !had_errors && !text.is_empty() {
                return text.into_owned();
            }
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Higher for text whose lines split into several cells.
fn tabular_score(text: &str) -> i64 {
    let mut score = 0_i64;
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        score += if row_cells(line, 2).len() >= 2 { 50 } else { 1 };
    }
    if looks_garbled(text) {
        score -= 800;
    }
    score
}

/// Walk the page content stream and collect text-showing operators, breaking
/// lines on text positioning operators.
fn content_stream_text(document: &Document, page_id: ObjectId) -> Option<String> {
    fn push_operands(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => text.push_str(&decode_text_operand(encoding, bytes)),
                Object::Array(items) => push_operands(text, encoding, items),
                Object::Integer(kerning) if *kerning < -100 => text.push(' '),
                Object::Real(kerning) if *kerning < -100.0 => text.push(' '),
                _ => {}
            }
        }
    }

    let raw = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .and_then(|name| encodings.get(name).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => push_operands(&mut line, encoding, &operation.operands),
            "T*" | "Td" | "TD" | "ET" => {
                let finished = std::mem::take(&mut line);
                if !finished.trim().is_empty() {
                    lines.push(finished);
                }
            }
            _ => {}
        }
    }
    if !line.trim().is_empty() {
        lines.push(line);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}
