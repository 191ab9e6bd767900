use crate::model::{PageText, RawTable};
use crate::table_parse::{CellSpan, align_rows, soft_split_line_into_spans, split_line_into_spans};

/// A decoded page that can report the tables located on it, in reading order.
pub trait TablePage {
    fn page_number(&self) -> u32;

    fn extract_tables(&self) -> Vec<RawTable>;
}

/// A page whose tables were located up front by some other means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPage {
    pub page_number: u32,
    pub tables: Vec<RawTable>,
}

impl StaticPage {
    #[must_use]
    pub fn new(page_number: u32, tables: Vec<RawTable>) -> Self {
        Self {
            page_number,
            tables,
        }
    }
}

impl TablePage for StaticPage {
    fn page_number(&self) -> u32 {
        self.page_number
    }

    fn extract_tables(&self) -> Vec<RawTable> {
        self.tables.clone()
    }
}

/// How a line was accepted as a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowSplit {
    /// Cells separated by a tab or a run of spaces.
    Delimited,
    /// Cells separated by single spaces on a short or numeric line.
    Soft,
}

/// Finds tables in the text layout of a page.
///
/// A line that splits into at least `min_cols` cells is a table row and consecutive rows
/// form one table. Blank lines inside a run are kept as empty rows; any other line ends
/// the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTableLocator {
    min_cols: usize,
}

impl TextTableLocator {
    #[must_use]
    pub fn new(min_cols: usize) -> Self {
        Self {
            min_cols: min_cols.max(2),
        }
    }

    /// Splits `line` into cells if it qualifies as a table row, reporting which rule
    /// accepted it.
    pub(crate) fn split_row(&self, line: &str) -> Option<(RowSplit, Vec<CellSpan>)> {
        let cells = split_line_into_spans(line);
        if cells.len() >= self.min_cols {
            return Some((RowSplit::Delimited, cells));
        }

        let soft_cells = soft_split_line_into_spans(line);
        let has_numeric = soft_cells
            .iter()
            .any(|cell| cell.text.chars().any(|ch| ch.is_ascii_digit()));
        let looks_like_sentence = ['.', '!', '?']
            .iter()
            .any(|punctuation| line.trim_end().ends_with(*punctuation));
        if soft_cells.len() >= self.min_cols
            && !looks_like_sentence
            && (has_numeric || soft_cells.len() <= 6)
        {
            return Some((RowSplit::Soft, soft_cells));
        }

        None
    }

    #[must_use]
    pub fn locate(&self, page: &PageText) -> Vec<RawTable> {
        let mut tables = Vec::new();
        let mut current_rows: Vec<Vec<CellSpan>> = Vec::new();

        let flush_current = |rows: &mut Vec<Vec<CellSpan>>, tables: &mut Vec<RawTable>| {
            while rows.last().is_some_and(Vec::is_empty) {
                rows.pop();
            }
            if rows.iter().filter(|row| !row.is_empty()).count() >= 2 {
                tables.push(RawTable::new(align_rows(rows)));
            }
            rows.clear();
        };

        for line in page.text.lines() {
            if line.trim().is_empty() {
                if !current_rows.is_empty() {
                    current_rows.push(Vec::new());
                }
                continue;
            }

            match self.split_row(line) {
                Some((_, cells)) => current_rows.push(cells),
                None => flush_current(&mut current_rows, &mut tables),
            }
        }

        flush_current(&mut current_rows, &mut tables);
        tables
    }
}

impl Default for TextTableLocator {
    fn default() -> Self {
        Self::new(2)
    }
}

/// A text page paired with the locator that finds its tables.
#[derive(Debug, Clone, Copy)]
pub struct LocatedPage<'a> {
    page: &'a PageText,
    locator: TextTableLocator,
}

impl<'a> LocatedPage<'a> {
    #[must_use]
    pub fn new(page: &'a PageText, locator: TextTableLocator) -> Self {
        Self { page, locator }
    }
}

impl TablePage for LocatedPage<'_> {
    fn page_number(&self) -> u32 {
        self.page.page_number
    }

    fn extract_tables(&self) -> Vec<RawTable> {
        self.locator.locate(self.page)
    }
}
