/// Split a layout line into cells on tabs or runs of two or more spaces.
pub(crate) fn split_on_column_gaps(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut gap = 0_usize;

    let flush = |current: &mut String, cells: &mut Vec<String>| {
        let cell = current.trim();
        if !cell.is_empty() {
            cells.push(cell.to_string());
        }
        current.clear();
    };

    for ch in trimmed.chars() {
        if ch == '\t' {
            flush(&mut current, &mut cells);
            gap = 0;
        } else if ch.is_whitespace() {
            gap += 1;
            if gap == 2 {
                flush(&mut current, &mut cells);
            } else if gap == 1 {
                current.push(' ');
            }
        } else {
            gap = 0;
            current.push(ch);
        }
    }
    flush(&mut current, &mut cells);

    cells
}

pub(crate) fn split_on_whitespace(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Sentences end in punctuation; table rows rarely do.
pub(crate) fn looks_like_sentence(line: &str) -> bool {
    line.trim_end().ends_with(['.', '!', '?'])
}

/// Cells for one candidate table row, or fewer than `min_cols` if the line
/// does not look tabular.
pub(crate) fn row_cells(line: &str, min_cols: usize) -> Vec<String> {
    let cells = split_on_column_gaps(line);
    if cells.len() >= min_cols {
        return cells;
    }

    let words = split_on_whitespace(line);
    let has_digit = words
        .iter()
        .any(|word| word.chars().any(|ch| ch.is_ascii_digit()));
    if words.len() >= min_cols && !looks_like_sentence(line) && (has_digit || words.len() <= 6) {
        words
    } else {
        cells
    }
}
