use crate::model::Cell;

/// A cell's text plus the character column where it starts on its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CellSpan {
    pub start: usize,
    pub text: String,
}

fn flush_span(spans: &mut Vec<CellSpan>, current: &mut String, start: usize) {
    let text = current.trim();
    if !text.is_empty() {
        spans.push(CellSpan {
            start,
            text: text.to_string(),
        });
    }
    current.clear();
}

/// Splits on tabs and on runs of two or more spaces.
pub(crate) fn split_line_into_spans(line: &str) -> Vec<CellSpan> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut start = 0_usize;
    let mut whitespace_run = 0_usize;

    for (column, ch) in line.chars().enumerate() {
        if ch == '\t' {
            flush_span(&mut spans, &mut current, start);
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                flush_span(&mut spans, &mut current, start);
                continue;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            continue;
        }

        whitespace_run = 0;
        if current.is_empty() {
            start = column;
        }
        current.push(ch);
    }

    flush_span(&mut spans, &mut current, start);
    spans
}

pub(crate) fn soft_split_line_into_spans(line: &str) -> Vec<CellSpan> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut start = 0_usize;

    for (column, ch) in line.chars().enumerate() {
        if ch.is_whitespace() {
            flush_span(&mut spans, &mut current, start);
            continue;
        }
        if current.is_empty() {
            start = column;
        }
        current.push(ch);
    }

    flush_span(&mut spans, &mut current, start);
    spans
}

fn place_spans(row: &[CellSpan], anchors: &[usize]) -> Vec<Cell> {
    let mut out = vec![Cell::Absent; anchors.len()];
    let mut next_slot = 0_usize;

    for (index, span) in row.iter().enumerate() {
        // leave one slot for every span still to be placed
        let last_slot = anchors.len() - (row.len() - index);
        let slot = (next_slot..=last_slot)
            .min_by_key(|&slot| anchors[slot].abs_diff(span.start))
            .unwrap_or(next_slot);
        out[slot] = Cell::Present(span.text.clone());
        next_slot = slot + 1;
    }

    out
}

/// Lays span rows onto the column anchors of the first widest row.
///
/// Narrower rows get `Absent` cells wherever no span lines up with an anchor.
/// Empty rows stay empty.
pub(crate) fn align_rows(rows: &[Vec<CellSpan>]) -> Vec<Vec<Cell>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let Some(anchor_row) = rows.iter().find(|row| row.len() == width) else {
        return Vec::new();
    };
    let anchors = anchor_row.iter().map(|span| span.start).collect::<Vec<_>>();

    rows.iter()
        .map(|row| {
            if row.is_empty() {
                return Vec::new();
            }
            if row.len() == width {
                return row
                    .iter()
                    .map(|span| Cell::Present(span.text.clone()))
                    .collect();
            }
            place_spans(row, &anchors)
        })
        .collect()
}
