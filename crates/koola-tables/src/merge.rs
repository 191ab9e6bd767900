use std::collections::HashMap;

use crate::model::{CleanedFrame, ColumnKey, CombinedFrame};

/// Concatenates frames row-wise over the union of their columns.
///
/// Columns keep the order in which they are first seen; cells a frame has no column for
/// are left empty.
pub(crate) fn concat_frames(frames: Vec<CleanedFrame>) -> CombinedFrame {
    let mut columns: Vec<ColumnKey> = Vec::new();
    let mut positions: HashMap<ColumnKey, usize> = HashMap::new();
    for column in frames.iter().flat_map(|frame| frame.columns.iter()) {
        if !positions.contains_key(column) {
            positions.insert(column.clone(), columns.len());
            columns.push(column.clone());
        }
    }

    let width = columns.len();
    let table_count = frames.len();
    let mut rows = Vec::new();
    for frame in frames {
        let slots = frame
            .columns
            .iter()
            .map(|column| positions[column])
            .collect::<Vec<_>>();
        for data_row in frame.rows {
            let mut row = vec![String::new(); width];
            for (&slot, cell) in slots.iter().zip(data_row) {
                row[slot] = cell.into_string();
            }
            rows.push(row);
        }
    }

    CombinedFrame {
        columns,
        row_count: rows.len(),
        table_count,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use crate::merge::concat_frames;
    use crate::model::{Cell, CleanedFrame, ColumnKey};

    fn named(label: &str) -> ColumnKey {
        ColumnKey::Named(label.to_string())
    }

    #[test]
    fn unions_columns_in_first_seen_order_and_fills_gaps() {
        let frames = vec![
            CleanedFrame {
                page: 1,
                table_id: 1,
                columns: vec![named("Name"), named("Age")],
                rows: vec![vec![Cell::from("Alice"), Cell::Absent]],
            },
            CleanedFrame {
                page: 2,
                table_id: 1,
                columns: vec![named("City"), named("Name")],
                rows: vec![vec![Cell::from("Oslo"), Cell::from("Bob")]],
            },
        ];

        let merged = concat_frames(frames);
        assert_eq!(merged.columns, vec![named("Name"), named("Age"), named("City")]);
        assert_eq!(merged.rows[0], vec!["Alice", "", ""]);
        assert_eq!(merged.rows[1], vec!["Bob", "", "Oslo"]);
        assert_eq!(merged.table_count, 2);
        assert_eq!(merged.row_count, 2);
    }

    #[test]
    fn positional_and_named_columns_do_not_merge() {
        let frames = vec![
            CleanedFrame {
                page: 1,
                table_id: 1,
                columns: vec![ColumnKey::Position(0)],
                rows: vec![vec![Cell::from("x")]],
            },
            CleanedFrame {
                page: 1,
                table_id: 2,
                columns: vec![named("0")],
                rows: vec![vec![Cell::from("y")]],
            },
        ];

        let merged = concat_frames(frames);
        assert_eq!(merged.columns.len(), 2);
        assert_eq!(merged.rows, vec![vec!["x", ""], vec!["", "y"]]);
    }
}
