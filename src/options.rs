use std::collections::BTreeSet;
use std::num::IntErrorKind;

/// Parse a 1-based page number. Numbers too large for `usize` saturate so a
/// range ending in one still clamps to the last page.
fn parse_page(token: &str) -> Option<usize> {
    match token.trim().parse::<usize>() {
        Ok(page) => Some(page),
        Err(error) if *error.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
        Err(_) => None,
    }
}

/// Parse a page-range expression like `"1, 3-5, 10"` into sorted, unique
/// 0-based page indices.
///
/// Pages are 1-based in the expression. Ranges may be written in either
/// direction and are clamped to the document; single pages outside the
/// document and tokens that are not numbers are skipped.
#[must_use]
pub fn parse_selection(expression: &str, total_pages: usize) -> Vec<usize> {
    let mut pages = BTreeSet::new();

    for token in expression.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some((start, end)) = token.split_once('-') {
            let (Some(start), Some(end)) = (parse_page(start), parse_page(end)) else {
                continue;
            };
            let low = start.min(end).max(1);
            let high = start.max(end).min(total_pages);
            pages.extend((low..=high).map(|page| page - 1));
        } else if let Some(page) = parse_page(token) {
            if (1..=total_pages).contains(&page) {
                pages.insert(page - 1);
            }
        }
    }

    pages.into_iter().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<usize>,
}

impl PageSelection {
    #[must_use]
    pub fn parse(expression: &str, total_pages: usize) -> Self {
        Self {
            indices: parse_selection(expression, total_pages),
        }
    }

    /// Whether the 0-based page index is selected.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// 1-based page numbers joined for display, e.g. `"1, 3, 4"`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.indices
            .iter()
            .map(|index| (index + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageScope {
    #[default]
    All,
    Selected(PageSelection),
}

impl PageScope {
    /// 0-based indices of the pages to process.
    #[must_use]
    pub fn resolve(&self, page_count: usize) -> Vec<usize> {
        match self {
            Self::All => (0..page_count).collect(),
            Self::Selected(selection) => (0..page_count)
                .filter(|&index| selection.contains(index))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub scope: PageScope,
    pub min_cols: usize,
    pub require_text: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            scope: PageScope::All,
            min_cols: 2,
            require_text: true,
        }
    }
}
