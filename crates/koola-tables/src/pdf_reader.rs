use std::collections::BTreeMap;
use std::path::Path;

use encoding_rs::UTF_16BE;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use crate::error::ExtractError;
use crate::model::PageText;
use crate::options::PageSelection;
use crate::table_detect::{RowSplit, TextTableLocator};

/// Baseline distance, in text space units, under which two runs share a line.
const SAME_LINE_TOLERANCE: f32 = 2.0;

/// Placed between runs that share a line so the locator sees a cell boundary.
const CELL_SEPARATOR: &str = "  ";

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_decoding_broken(text: &str) -> bool {
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
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();
    replacement * 8 > total || control * 5 > total
}

/// Decodes a string operand with the font's encoding, falling back to UTF-16BE for
/// strings that carry a byte order mark or come from a two-byte encoding.
fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    let two_byte = encoding.is_some_and(|name| {
        let name = name.to_ascii_lowercase();
        name.contains("identity-h") || name.contains("utf16") || name.contains("ucs2")
    });
    let payload = bytes.strip_prefix(&[0xFE, 0xFF]);
    if let Some(payload) = payload.or(two_byte.then_some(bytes)) {
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(payload);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Rates how much table structure a candidate text exposes to `locator`.
///
/// Rows split on explicit separators outrank soft single-space rows, and any other
/// non-blank line adds a little so that longer readings win ties over empty ones.
fn table_row_score(text: &str, locator: &TextTableLocator) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let score = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match locator.split_row(line) {
            Some((RowSplit::Delimited, _)) => 50,
            Some((RowSplit::Soft, _)) => 30,
            None => 1,
        })
        .sum::<i64>();

    if looks_decoding_broken(text) {
        score - 800
    } else {
        score
    }
}

/// Picks the candidate with the highest table score; earlier candidates win ties.
fn choose_best_text(candidates: Vec<String>, locator: &TextTableLocator) -> String {
    let mut best: Option<(i64, String)> = None;
    for text in candidates {
        let score = table_row_score(&text, locator);
        if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
            best = Some((score, text));
        }
    }
    best.map(|(_, text)| text).unwrap_or_default()
}

/// A piece of shown text and the text-space origin of the line it was drawn on.
#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    x: f32,
    y: f32,
    text: String,
}

/// Tracks the start of the current text line through the positioning operators.
#[derive(Debug, Default)]
struct TextCursor {
    x: f32,
    y: f32,
    leading: f32,
    moved: bool,
}

impl TextCursor {
    fn begin_text(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.moved = true;
    }

    fn move_by(&mut self, tx: f32, ty: f32) {
        self.x += tx;
        self.y += ty;
        self.moved = true;
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.moved = true;
    }

    fn next_line(&mut self) {
        self.y -= self.leading;
        self.moved = true;
    }
}

fn number_operands<const N: usize>(operands: &[Object]) -> Option<[f32; N]> {
    let start = operands.len().checked_sub(N)?;
    let mut values = [0.0_f32; N];
    for (value, operand) in values.iter_mut().zip(&operands[start..]) {
        *value = operand.as_float().ok()?;
    }
    Some(values)
}

fn collect_shown_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&decode_pdf_bytes(encoding, bytes)),
            Object::Array(items) => collect_shown_text(text, encoding, items),
            // a wide negative kerning adjustment reads as a word gap
            Object::Integer(value) if *value < -100 => text.push(' '),
            Object::Real(value) if *value < -100.0 => text.push(' '),
            _ => {}
        }
    }
}

/// Walks a page's content stream and records every shown string with its line origin.
fn read_text_runs(document: &Document, page_id: ObjectId) -> Option<Vec<TextRun>> {
    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut runs: Vec<TextRun> = Vec::new();
    let mut cursor = TextCursor::default();
    let mut encoding = None;

    for operation in &content.operations {
        let operands = operation.operands.as_slice();
        let shown: &[Object] = match operation.operator.as_str() {
            "BT" => {
                cursor.begin_text();
                continue;
            }
            "Tf" => {
                if let Some(font_name) = operands.first().and_then(|name| name.as_name().ok()) {
                    encoding = encodings.get(font_name).copied();
                }
                continue;
            }
            "TL" => {
                if let Some([leading]) = number_operands(operands) {
                    cursor.leading = leading;
                }
                continue;
            }
            "Td" | "TD" => {
                if let Some([tx, ty]) = number_operands(operands) {
                    if operation.operator == "TD" {
                        cursor.leading = -ty;
                    }
                    cursor.move_by(tx, ty);
                }
                continue;
            }
            "Tm" => {
                if let Some([_, _, _, _, e, f]) = number_operands(operands) {
                    cursor.move_to(e, f);
                }
                continue;
            }
            "T*" => {
                cursor.next_line();
                continue;
            }
            "Tj" | "TJ" => operands,
            "'" | "\"" => {
                cursor.next_line();
                operands.last().map(std::slice::from_ref).unwrap_or_default()
            }
            _ => continue,
        };

        let mut text = String::new();
        collect_shown_text(&mut text, encoding, shown);
        if text.is_empty() {
            continue;
        }

        match runs.last_mut() {
            Some(last) if !cursor.moved => last.text.push_str(&text),
            _ => runs.push(TextRun {
                x: cursor.x,
                y: cursor.y,
                text,
            }),
        }
        cursor.moved = false;
    }

    Some(runs)
}

/// Groups runs into lines top to bottom and joins the runs of a line left to right.
fn layout_lines(mut runs: Vec<TextRun>) -> Vec<String> {
    runs.retain(|run| !run.text.trim().is_empty());
    runs.sort_by(|left, right| right.y.total_cmp(&left.y));

    let mut lines: Vec<(f32, Vec<TextRun>)> = Vec::new();
    for run in runs {
        match lines.last_mut() {
            Some((baseline, line)) if (*baseline - run.y).abs() <= SAME_LINE_TOLERANCE => {
                line.push(run);
            }
            _ => lines.push((run.y, vec![run])),
        }
    }

    lines
        .into_iter()
        .map(|(_, mut line)| {
            line.sort_by(|left, right| left.x.total_cmp(&right.x));
            line.iter()
                .map(|run| run.text.trim_end())
                .collect::<Vec<_>>()
                .join(CELL_SEPARATOR)
        })
        .collect()
}

fn extract_text_from_page_content(document: &Document, page_id: ObjectId) -> Option<String> {
    let lines = layout_lines(read_text_runs(document, page_id)?);
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn collect_pages(
    document: &Document,
    extracted_text: Option<String>,
    page_selection: Option<&PageSelection>,
    locator: &TextTableLocator,
) -> Result<Vec<PageText>, ExtractError> {
    let pages_map = document.get_pages();

    let (pdf_extract_pages, pdf_extract_whole) = match extracted_text {
        Some(text) => {
            let pages = split_text_into_pages(&text);
            if pages.len() == pages_map.len() {
                (Some(pages), None)
            } else {
                (None, Some(text))
            }
        }
        None => (None, None),
    };

    let mut pages = Vec::new();
    for (index, (page_no, page_id)) in pages_map.iter().enumerate() {
        if page_selection.is_some_and(|selection| !selection.contains(*page_no)) {
            continue;
        }

        let mut candidates = Vec::new();
        if let Some(text) = extract_text_from_page_content(document, *page_id) {
            candidates.push(text);
        }
        if let Some(text) = pdf_extract_pages
            .as_ref()
            .and_then(|fallback| fallback.get(index).cloned())
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }
        if let Some(text) = document
            .extract_text(&[*page_no])
            .ok()
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }

        // a single-page document whose text did not split cleanly
        if candidates.is_empty()
            && pages_map.len() == 1
            && let Some(text) = pdf_extract_whole
                .as_ref()
                .filter(|text| !text.trim().is_empty())
                .cloned()
        {
            candidates.push(text);
        }

        let candidate_count = candidates.len();
        let text = choose_best_text(candidates, locator);
        debug!(
            page = *page_no,
            candidates = candidate_count,
            chars = text.len(),
            "read page text"
        );

        pages.push(PageText {
            page_number: *page_no,
            text,
        });
    }

    if pages.is_empty() {
        return Err(ExtractError::NoPagesSelected);
    }

    Ok(pages)
}

pub(crate) fn read_pdf_pages(
    input_pdf: &Path,
    page_selection: Option<&PageSelection>,
    locator: &TextTableLocator,
) -> Result<Vec<PageText>, ExtractError> {
    let document = Document::load(input_pdf)?;
    let extracted_text = pdf_extract::extract_text(input_pdf).ok();
    collect_pages(&document, extracted_text, page_selection, locator)
}

pub(crate) fn read_pdf_pages_from_bytes(
    input_pdf: &[u8],
    page_selection: Option<&PageSelection>,
    locator: &TextTableLocator,
) -> Result<Vec<PageText>, ExtractError> {
    let document = Document::load_mem(input_pdf)?;
    let extracted_text = pdf_extract::extract_text_from_mem(input_pdf).ok();
    collect_pages(&document, extracted_text, page_selection, locator)
}

#[cfg(test)]
mod tests {
    use super::{TextRun, choose_best_text, decode_pdf_bytes, layout_lines, split_text_into_pages};
    use crate::table_detect::TextTableLocator;

    fn run(x: f32, y: f32, text: &str) -> TextRun {
        TextRun {
            x,
            y,
            text: text.to_string(),
        }
    }

    #[test]
    fn splits_form_feed_delimited_pages() {
        let pages = split_text_into_pages("p1\u{000C}p2\u{000C}");
        assert_eq!(pages, vec!["p1", "p2"]);
    }

    #[test]
    fn prefers_candidate_with_more_table_rows() {
        let prose = "Quarterly summary\nRevenue grew in every region.".to_string();
        let table = "Region  Revenue\nNorth  120\nSouth  95".to_string();
        let best = choose_best_text(vec![prose, table.clone()], &TextTableLocator::default());
        assert_eq!(best, table);
    }

    #[test]
    fn soft_rows_outrank_one_cell_per_line() {
        let per_cell = "Name\nAge\nAlice\n30\nBob\n25".to_string();
        let soft = "\n\nName Age\n\nAlice 30\n\nBob 25".to_string();
        let best = choose_best_text(vec![per_cell, soft.clone()], &TextTableLocator::default());
        assert_eq!(best, soft);
    }

    #[test]
    fn delimited_rows_outrank_soft_rows() {
        let soft = "Name Age\nAlice Smith 30".to_string();
        let delimited = "Name  Age\nAlice Smith  30".to_string();
        let best = choose_best_text(vec![soft, delimited.clone()], &TextTableLocator::default());
        assert_eq!(best, delimited);
    }

    #[test]
    fn runs_on_one_baseline_become_cells_of_one_line() {
        let runs = vec![
            run(50.0, 780.0, "Name"),
            run(200.0, 780.0, "Age"),
            run(50.0, 760.0, "Alice"),
            run(200.0, 760.5, "30"),
        ];
        assert_eq!(layout_lines(runs), vec!["Name  Age", "Alice  30"]);
    }

    #[test]
    fn lines_are_ordered_top_down_and_cells_left_to_right() {
        let runs = vec![
            run(200.0, 760.0, "25"),
            run(50.0, 760.0, "Bob"),
            run(200.0, 780.0, "Age"),
            run(50.0, 780.0, "Name"),
            run(50.0, 770.0, " "),
        ];
        assert_eq!(layout_lines(runs), vec!["Name  Age", "Bob  25"]);
    }

    #[test]
    fn decodes_utf16_strings_with_a_byte_order_mark() {
        let bytes = [0xFE, 0xFF, 0x00, 0x51, 0x00, 0x31];
        assert_eq!(decode_pdf_bytes(Some("PDFDocEncoding"), &bytes), "Q1");
    }

    #[test]
    fn falls_back_to_utf16_for_two_byte_fonts() {
        let bytes = [0x00, 0x51, 0x00, 0x31];
        assert_eq!(decode_pdf_bytes(Some("Identity-H"), &bytes), "Q1");
    }
}
