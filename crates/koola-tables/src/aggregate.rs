use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::merge::concat_frames;
use crate::model::CombinedFrame;
use crate::normalize::normalize_table_with;
use crate::options::HeaderMode;
use crate::table_detect::TablePage;
use crate::warning::ExtractWarning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub frame: CombinedFrame,
    pub warnings: Vec<ExtractWarning>,
}

/// Normalizes every table of every page, in order, and stacks the results.
///
/// # Errors
///
/// Returns [`ExtractError::NoTablesFound`] when no page yields a non-empty table.
pub fn aggregate<P: TablePage>(pages: &[P]) -> Result<CombinedFrame, ExtractError> {
    aggregate_with_mode(pages, HeaderMode::AutoDetect).map(|aggregation| aggregation.frame)
}

/// Like [`aggregate`], with an explicit header policy and the warnings collected on the way.
///
/// # Errors
///
/// Returns [`ExtractError::NoTablesFound`] when no page yields a non-empty table.
pub fn aggregate_with_mode<P: TablePage>(
    pages: &[P],
    mode: HeaderMode,
) -> Result<Aggregation, ExtractError> {
    let mut warnings = Vec::new();
    let mut frames = Vec::new();

    for page in pages {
        let page_number = page.page_number();
        let tables = page.extract_tables();
        debug!(page = page_number, tables = tables.len(), "located tables");

        for (index, table) in tables.into_iter().enumerate() {
            let table_id = index + 1;
            if let Some(frame) =
                normalize_table_with(table, page_number, table_id, mode, &mut warnings)
            {
                frames.push(frame);
            }
        }
    }

    if frames.is_empty() {
        warn!(pages = pages.len(), "no non-empty tables in document");
        return Err(ExtractError::NoTablesFound);
    }

    Ok(Aggregation {
        frame: concat_frames(frames),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::{aggregate, aggregate_with_mode};
    use crate::error::ExtractError;
    use crate::model::{ColumnKey, RawTable};
    use crate::options::HeaderMode;
    use crate::table_detect::StaticPage;
    use crate::warning::WarningCode;

    fn table(rows: &[&[&str]]) -> RawTable {
        rows.iter().map(|row| row.iter().copied()).collect()
    }

    #[test]
    fn keeps_page_then_table_order() {
        let pages = vec![
            StaticPage::new(
                1,
                vec![
                    table(&[&["k", "v"], &["1a", "x"], &["1a'", "y"]]),
                    table(&[&["k", "v"], &["1b", "z"]]),
                ],
            ),
            StaticPage::new(2, vec![table(&[&["k", "v"], &["2a", "w"]])]),
        ];

        let combined = aggregate(&pages).expect("tables should be found");
        let keys = combined
            .rows
            .iter()
            .map(|row| row[0].as_str())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["1a", "1a'", "1b", "2a"]);
        assert_eq!(combined.table_count, 3);
    }

    #[test]
    fn one_row_tables_stack_under_positional_columns() {
        let pages = vec![
            StaticPage::new(1, vec![table(&[&["a", "b"]])]),
            StaticPage::new(2, vec![table(&[&["c", "d"]])]),
        ];

        let combined = aggregate(&pages).expect("tables should be found");
        assert_eq!(
            combined.columns,
            vec![ColumnKey::Position(0), ColumnKey::Position(1)]
        );
        assert_eq!(combined.rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn document_without_tables_fails() {
        let pages = vec![StaticPage::new(1, Vec::new()), StaticPage::new(2, Vec::new())];
        assert!(matches!(aggregate(&pages), Err(ExtractError::NoTablesFound)));

        let blank = vec![StaticPage::new(1, vec![table(&[&[" ", ""]]), RawTable::default()])];
        assert!(matches!(aggregate(&blank), Err(ExtractError::NoTablesFound)));

        let no_pages: Vec<StaticPage> = Vec::new();
        assert!(matches!(aggregate(&no_pages), Err(ExtractError::NoTablesFound)));
    }

    #[test]
    fn collects_warnings_for_skipped_tables() {
        let pages = vec![StaticPage::new(
            4,
            vec![table(&[&["", ""]]), table(&[&["X", "X"], &["1", "2"]])],
        )];

        let aggregation =
            aggregate_with_mode(&pages, HeaderMode::AutoDetect).expect("one table survives");
        let codes = aggregation
            .warnings
            .iter()
            .map(|warning| (warning.code.clone(), warning.table_id))
            .collect::<Vec<_>>();
        assert_eq!(
            codes,
            vec![
                (WarningCode::EmptyTableSkipped, Some(1)),
                (WarningCode::HeaderNotPromoted, Some(2)),
            ]
        );
        assert_eq!(aggregation.frame.row_count, 2);
    }
}
