use tracing::debug;

use crate::header::{HeaderDecision, PositionalReason, infer_header};
use crate::model::{Cell, CleanedFrame, ColumnKey, RawTable};
use crate::options::HeaderMode;
use crate::warning::{ExtractWarning, WarningCode};

fn pad_and_blank(row: Vec<Cell>, width: usize) -> Vec<Cell> {
    let mut cells = row
        .into_iter()
        .map(Cell::blank_to_absent)
        .collect::<Vec<_>>();
    cells.resize(width, Cell::Absent);
    cells
}

fn project_columns(row: Vec<Cell>, kept: &[usize]) -> Vec<Cell> {
    row.into_iter()
        .enumerate()
        .filter_map(|(index, cell)| kept.binary_search(&index).is_ok().then_some(cell))
        .collect()
}

/// Cleans one located table and infers its header.
///
/// Returns `None` when nothing but absent cells is left. Normalizing
/// [`CleanedFrame::to_raw_table`] again yields the same header and rows, except that
/// positional columns are renumbered from 0 when an earlier pass dropped a column
/// between them.
#[must_use]
pub fn normalize_table(raw: RawTable, page: u32, table_id: usize) -> Option<CleanedFrame> {
    normalize_table_with(raw, page, table_id, HeaderMode::AutoDetect, &mut Vec::new())
}

pub(crate) fn normalize_table_with(
    raw: RawTable,
    page: u32,
    table_id: usize,
    mode: HeaderMode,
    warnings: &mut Vec<ExtractWarning>,
) -> Option<CleanedFrame> {
    let width = raw.width();
    let mut rows = raw
        .rows
        .into_iter()
        .map(|row| pad_and_blank(row, width))
        .filter(|row| row.iter().any(|cell| !cell.is_absent()))
        .collect::<Vec<_>>();

    if rows.is_empty() {
        debug!(page, table_id, "table has no non-blank rows");
        warnings.push(
            ExtractWarning::new(
                WarningCode::EmptyTableSkipped,
                "table contains only blank cells; skipped",
            )
            .with_page(page)
            .with_table_id(table_id),
        );
        return None;
    }

    let kept = (0..width)
        .filter(|&column| rows.iter().any(|row| !row[column].is_absent()))
        .collect::<Vec<_>>();
    if kept.len() < width {
        debug!(
            page,
            table_id,
            dropped = width - kept.len(),
            "dropping blank columns"
        );
        rows = rows
            .into_iter()
            .map(|row| project_columns(row, &kept))
            .collect();
    }

    let columns = match infer_header(&rows, mode) {
        HeaderDecision::Promote(labels) => {
            rows.remove(0);
            labels.into_iter().map(ColumnKey::Named).collect()
        }
        HeaderDecision::Positional(reason) => {
            if reason == PositionalReason::DuplicateLabels {
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::HeaderNotPromoted,
                        "first row repeats a label; keeping it as data",
                    )
                    .with_page(page)
                    .with_table_id(table_id),
                );
            }
            debug!(page, table_id, ?reason, "keeping positional columns");
            kept.iter().copied().map(ColumnKey::Position).collect()
        }
    };

    if rows.is_empty() {
        return None;
    }

    Some(CleanedFrame {
        page,
        table_id,
        columns,
        rows,
    })
}
