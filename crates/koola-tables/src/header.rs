use std::collections::HashSet;

use crate::model::Cell;
use crate::options::HeaderMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeaderDecision {
    Promote(Vec<String>),
    Positional(PositionalReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PositionalReason {
    Disabled,
    NoRows,
    FirstRowAbsent,
    DuplicateLabels,
    SingleRow,
}

fn labels_are_distinct(labels: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(labels.len());
    labels.iter().all(|label| seen.insert(label.as_str()))
}

/// Decides whether the first row of an already cleaned grid names its columns.
///
/// The row is promoted only when its trimmed labels are pairwise distinct and at least
/// one row would remain below it. Absent cells count as empty labels.
pub(crate) fn infer_header(rows: &[Vec<Cell>], mode: HeaderMode) -> HeaderDecision {
    if mode == HeaderMode::NoHeader {
        return HeaderDecision::Positional(PositionalReason::Disabled);
    }

    let Some(first) = rows.first() else {
        return HeaderDecision::Positional(PositionalReason::NoRows);
    };

    if first.iter().all(Cell::is_absent) {
        return HeaderDecision::Positional(PositionalReason::FirstRowAbsent);
    }

    let labels = first
        .iter()
        .map(|cell| cell.as_str().trim().to_string())
        .collect::<Vec<_>>();
    if !labels_are_distinct(&labels) {
        return HeaderDecision::Positional(PositionalReason::DuplicateLabels);
    }

    if rows.len() < 2 {
        return HeaderDecision::Positional(PositionalReason::SingleRow);
    }

    HeaderDecision::Promote(labels)
}

#[cfg(test)]
mod tests {
    use super::{HeaderDecision, PositionalReason, infer_header};
    use crate::model::Cell;
    use crate::options::HeaderMode;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|cell| Cell::from(*cell)).collect()
    }

    #[test]
    fn promotes_distinct_trimmed_labels() {
        let rows = vec![row(&[" Name ", "Age"]), row(&["Alice", "30"])];
        assert_eq!(
            infer_header(&rows, HeaderMode::AutoDetect),
            HeaderDecision::Promote(vec!["Name".to_string(), "Age".to_string()])
        );
    }

    #[test]
    fn labels_equal_after_trimming_are_duplicates() {
        let rows = vec![row(&["X", " X"]), row(&["1", "2"])];
        assert_eq!(
            infer_header(&rows, HeaderMode::AutoDetect),
            HeaderDecision::Positional(PositionalReason::DuplicateLabels)
        );
    }

    #[test]
    fn two_absent_labels_collide() {
        let rows = vec![
            vec![Cell::from("A"), Cell::Absent, Cell::Absent],
            row(&["1", "2", "3"]),
        ];
        assert_eq!(
            infer_header(&rows, HeaderMode::AutoDetect),
            HeaderDecision::Positional(PositionalReason::DuplicateLabels)
        );
    }

    #[test]
    fn single_absent_label_becomes_empty_name() {
        let rows = vec![vec![Cell::from("A"), Cell::Absent], row(&["1", "2"])];
        assert_eq!(
            infer_header(&rows, HeaderMode::AutoDetect),
            HeaderDecision::Promote(vec!["A".to_string(), String::new()])
        );
    }

    #[test]
    fn lone_row_stays_data() {
        let rows = vec![row(&["a", "b"])];
        assert_eq!(
            infer_header(&rows, HeaderMode::AutoDetect),
            HeaderDecision::Positional(PositionalReason::SingleRow)
        );
    }

    #[test]
    fn no_header_mode_never_promotes() {
        let rows = vec![row(&["Name", "Age"]), row(&["Alice", "30"])];
        assert_eq!(
            infer_header(&rows, HeaderMode::NoHeader),
            HeaderDecision::Positional(PositionalReason::Disabled)
        );
    }
}
