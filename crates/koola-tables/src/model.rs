use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// A single cell as located on a page.
///
/// Whitespace-only `Present` values stay distinct from `Absent` until a table is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Present(String),
    Absent,
}

impl Cell {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Present(value) => value,
            Self::Absent => "",
        }
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Present(value) => value,
            Self::Absent => String::new(),
        }
    }

    pub(crate) fn blank_to_absent(self) -> Self {
        match self {
            Self::Present(value) if value.trim().is_empty() => Self::Absent,
            other => other,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Present(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Present(value)
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, Self::from)
    }
}

/// Unprocessed grid of cells, possibly ragged and sparse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    #[must_use]
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl<R, C> FromIterator<R> for RawTable
where
    R: IntoIterator<Item = C>,
    C: Into<Cell>,
{
    fn from_iter<I: IntoIterator<Item = R>>(rows: I) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// Label taken from a promoted header row.
    Named(String),
    /// Original column index of a table without a promoted header.
    Position(usize),
}

impl Display for ColumnKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Position(index) => write!(f, "{index}"),
        }
    }
}

/// Rectangular table with an inferred header and no all-absent rows or columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedFrame {
    pub page: u32,
    pub table_id: usize,
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<Vec<Cell>>,
}

impl CleanedFrame {
    #[must_use]
    pub fn header_promoted(&self) -> bool {
        self.columns
            .iter()
            .any(|column| matches!(column, ColumnKey::Named(_)))
    }

    /// Lays the frame back out as a raw grid, header row first when one was promoted.
    #[must_use]
    pub fn to_raw_table(&self) -> RawTable {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        if self.header_promoted() {
            rows.push(
                self.columns
                    .iter()
                    .map(|column| Cell::Present(column.to_string()))
                    .collect(),
            );
        }
        rows.extend(self.rows.iter().cloned());
        RawTable { rows }
    }
}

/// Row-wise concatenation of every cleaned frame in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedFrame {
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<Vec<String>>,
    pub table_count: usize,
    pub row_count: usize,
}

impl CombinedFrame {
    #[must_use]
    pub fn header_labels(&self) -> Vec<String> {
        self.columns.iter().map(ToString::to_string).collect()
    }
}
